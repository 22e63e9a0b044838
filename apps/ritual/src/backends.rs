use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use ritual_core::{AudioCue, AudioService, CueSource, EngineLoader, ParticleRenderer};
use shared::{
    error::RenderError,
    particles::{ParticleProfile, ParticleSurface},
};
use tracing::{debug, info};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Audio backend that resolves cues against the asset directory and reports
/// playback through tracing. Missing files are skipped quietly.
pub struct AssetAudio {
    assets_dir: PathBuf,
    playing: Mutex<HashSet<AudioCue>>,
}

impl AssetAudio {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            playing: Mutex::new(HashSet::new()),
        }
    }
}

impl AudioService for AssetAudio {
    fn play(&self, cue: AudioCue) {
        let source = CueSource::resolve(&self.assets_dir, cue);
        if !source.path.is_file() {
            debug!(cue = cue.key(), path = %source.path.display(), "audio asset missing; cue skipped");
            return;
        }
        if source.looping {
            lock(&self.playing).insert(cue);
        }
        debug!(
            cue = cue.key(),
            volume = source.volume,
            looping = source.looping,
            "playing cue"
        );
    }

    fn stop(&self, cue: AudioCue) {
        if lock(&self.playing).remove(&cue) {
            debug!(cue = cue.key(), "stopped cue");
        }
    }

    fn is_playing(&self, cue: AudioCue) -> bool {
        lock(&self.playing).contains(&cue)
    }
}

/// Particle renderer for the terminal: each surface is a log line.
#[derive(Default)]
pub struct TracingRenderer {
    live: Mutex<HashSet<ParticleSurface>>,
}

#[cfg(test)]
impl TracingRenderer {
    fn is_live(&self, surface: ParticleSurface) -> bool {
        lock(&self.live).contains(&surface)
    }
}

impl ParticleRenderer for TracingRenderer {
    fn load(&self, surface: ParticleSurface, profile: &ParticleProfile) -> Result<(), RenderError> {
        if profile.palette.is_empty() {
            return Err(RenderError::surface(surface, "empty palette"));
        }
        lock(&self.live).insert(surface);
        info!(
            surface = surface.id(),
            z_index = profile.z_index,
            count = profile.density.count,
            one_shot = profile.is_one_shot(),
            "particles loaded"
        );
        Ok(())
    }

    fn destroy(&self, surface: ParticleSurface) {
        if lock(&self.live).remove(&surface) {
            debug!(surface = surface.id(), "particles destroyed");
        }
    }
}

/// Engine loader standing in for the asynchronous particle engine start-up.
pub struct WarmupLoader {
    delay: Duration,
}

impl WarmupLoader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl EngineLoader for WarmupLoader {
    async fn load(&self) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        debug!(delay_ms = self.delay.as_millis() as u64, "particle engine warmed up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        env, fs,
        sync::Arc,
        time::{SystemTime, UNIX_EPOCH},
    };

    use ritual_core::ParticleEngine;

    fn asset_dir_with(files: &[&str]) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("ritual_assets_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        for file in files {
            fs::write(dir.join(file), b"").expect("asset");
        }
        dir
    }

    #[test]
    fn missing_assets_are_skipped() {
        let audio = AssetAudio::new(env::temp_dir().join("ritual_assets_absent"));
        audio.play(AudioCue::Music);
        assert!(!audio.is_playing(AudioCue::Music));
        audio.stop(AudioCue::Music);
    }

    #[test]
    fn loops_are_tracked_until_stopped() {
        let dir = asset_dir_with(&[
            AudioCue::Music.file_name(),
            AudioCue::Click.file_name(),
        ]);
        let audio = AssetAudio::new(&dir);

        audio.play(AudioCue::Music);
        audio.play(AudioCue::Click);
        assert!(audio.is_playing(AudioCue::Music));
        assert!(!audio.is_playing(AudioCue::Click));

        audio.stop(AudioCue::Music);
        assert!(!audio.is_playing(AudioCue::Music));

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn renderer_tracks_live_surfaces() {
        let renderer = TracingRenderer::default();
        renderer
            .load(ParticleSurface::Burst, &ParticleSurface::Burst.profile())
            .expect("load");
        assert!(renderer.is_live(ParticleSurface::Burst));

        renderer.destroy(ParticleSurface::Burst);
        assert!(!renderer.is_live(ParticleSurface::Burst));
    }

    #[test]
    fn renderer_rejects_profiles_without_colors() {
        let renderer = TracingRenderer::default();
        let mut profile = ParticleSurface::Ambient.profile();
        profile.palette.clear();

        assert!(renderer.load(ParticleSurface::Ambient, &profile).is_err());
        assert!(!renderer.is_live(ParticleSurface::Ambient));
    }

    #[tokio::test(start_paused = true)]
    async fn warmup_loader_readies_the_engine_after_its_delay() {
        let engine = ParticleEngine::new(Arc::new(WarmupLoader::new(Duration::from_millis(250))));
        let ready = engine.ready_signal();
        assert!(!ready.is_ready());

        let init = Arc::clone(&engine);
        let started = tokio::time::Instant::now();
        tokio::spawn(async move { init.initialize().await });

        assert!(ready.wait().await);
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert!(engine.is_ready());
    }
}
