//! Audio and particle side effects keyed to flow transitions.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{error::RenderError, particles::ParticleSurface};
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::{
    audio::{AudioCue, AudioService},
    engine::{EngineReady, ParticleRenderer},
    timer::{FlowTimings, TimerSlot},
};

/// Which bundle of cues a transition asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectRequest {
    /// The flow is mounted: ambient music and the ambient particle field.
    SessionOpened,
    /// Leaving the intro screen: both ambient loops plus the chime.
    Entry,
    /// Any other forward move between input steps.
    Transition,
    ValidationError,
    Keystroke,
    /// The message was sealed: ambient audio stops, end sound and burst fire.
    Completion,
    FinaleShown,
    FinaleHidden,
}

pub struct EffectOrchestrator {
    audio: Arc<dyn AudioService>,
    surfaces: Arc<SurfaceBoard>,
    burst_teardown: TimerSlot,
    timings: FlowTimings,
}

impl EffectOrchestrator {
    /// Builds the orchestrator and, when the engine is not ready yet, spawns
    /// a watcher that renders any buffered surfaces once it is.
    pub fn new(
        audio: Arc<dyn AudioService>,
        renderer: Arc<dyn ParticleRenderer>,
        ready: EngineReady,
        timings: FlowTimings,
    ) -> Self {
        let surfaces = Arc::new(SurfaceBoard {
            renderer,
            state: Mutex::new(SurfaceState::default()),
        });

        if ready.is_ready() {
            surfaces.mark_ready();
        } else if let Ok(runtime) = Handle::try_current() {
            let board = Arc::clone(&surfaces);
            runtime.spawn(async move {
                if ready.wait().await {
                    board.mark_ready();
                }
            });
        } else {
            debug!("no async runtime available; particle surfaces stay idle");
        }

        Self {
            audio,
            surfaces,
            burst_teardown: TimerSlot::new("burst_teardown"),
            timings,
        }
    }

    pub fn apply(&self, request: EffectRequest) {
        trace!(?request, "applying effect bundle");
        match request {
            EffectRequest::SessionOpened => {
                self.play_loop(AudioCue::Music);
                self.surfaces.request(ParticleSurface::Ambient, true);
            }
            EffectRequest::Entry => {
                self.play_loop(AudioCue::Music);
                self.play_loop(AudioCue::Drone);
                self.chime();
            }
            EffectRequest::Transition => self.chime(),
            EffectRequest::ValidationError => self.audio.play(AudioCue::ErrorEmail),
            EffectRequest::Keystroke => self.audio.play(AudioCue::Click),
            EffectRequest::Completion => {
                self.audio.stop(AudioCue::Music);
                self.audio.stop(AudioCue::Drone);
                self.audio.play(AudioCue::EndSound);
                self.trigger_burst();
            }
            EffectRequest::FinaleShown => self.surfaces.request(ParticleSurface::Finale, true),
            EffectRequest::FinaleHidden => self.surfaces.request(ParticleSurface::Finale, false),
        }
    }

    pub fn engine_ready(&self) -> bool {
        self.surfaces.lock().engine_ready
    }

    pub fn is_surface_live(&self, surface: ParticleSurface) -> bool {
        self.surfaces.lock().live.contains(&surface)
    }

    pub fn burst_teardown_pending(&self) -> bool {
        self.burst_teardown.is_pending()
    }

    fn chime(&self) {
        self.audio.play(AudioCue::NextInput);
        self.audio.play(AudioCue::Reveal);
    }

    fn play_loop(&self, cue: AudioCue) {
        if self.audio.is_playing(cue) {
            trace!(cue = cue.key(), "loop already playing");
            return;
        }
        self.audio.play(cue);
    }

    fn trigger_burst(&self) {
        if !self.surfaces.load_burst() {
            return;
        }
        let board = Arc::clone(&self.surfaces);
        self.burst_teardown
            .arm(self.timings.burst_teardown, move || board.teardown_burst());
    }
}

struct SurfaceBoard {
    renderer: Arc<dyn ParticleRenderer>,
    state: Mutex<SurfaceState>,
}

#[derive(Default)]
struct SurfaceState {
    engine_ready: bool,
    ambient_requested: bool,
    finale_requested: bool,
    live: HashSet<ParticleSurface>,
}

impl SurfaceBoard {
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_ready(&self) {
        let mut state = self.lock();
        state.engine_ready = true;
        debug!("particle engine ready; rendering buffered surfaces");
        self.reconcile(&mut state);
    }

    fn request(&self, surface: ParticleSurface, wanted: bool) {
        let mut state = self.lock();
        match surface {
            ParticleSurface::Ambient => state.ambient_requested = wanted,
            ParticleSurface::Finale => state.finale_requested = wanted,
            ParticleSurface::Burst => return,
        }
        self.reconcile(&mut state);
    }

    /// Brings live surfaces in line with the requested ones. Before the engine
    /// is ready requests are only recorded.
    fn reconcile(&self, state: &mut SurfaceState) {
        if !state.engine_ready {
            return;
        }

        let wanted = [
            (ParticleSurface::Ambient, state.ambient_requested),
            (ParticleSurface::Finale, state.finale_requested),
        ];
        for (surface, requested) in wanted {
            let live = state.live.contains(&surface);
            if requested && !live {
                match self.renderer.load(surface, &surface.profile()) {
                    Ok(()) => {
                        state.live.insert(surface);
                    }
                    Err(error) => debug!(
                        surface = surface.id(),
                        %error,
                        code = ?error.code(),
                        "particle surface unavailable"
                    ),
                }
            } else if !requested && live {
                self.renderer.destroy(surface);
                state.live.remove(&surface);
            }
        }
    }

    /// The burst is never buffered: without a ready engine it is skipped.
    fn load_burst(&self) -> bool {
        let surface = ParticleSurface::Burst;
        let mut state = self.lock();
        let loaded = if state.engine_ready {
            self.renderer.load(surface, &surface.profile())
        } else {
            Err(RenderError::EngineNotReady)
        };
        match loaded {
            Ok(()) => {
                state.live.insert(surface);
                true
            }
            Err(error) => {
                debug!(surface = surface.id(), %error, code = ?error.code(), "burst skipped");
                false
            }
        }
    }

    fn teardown_burst(&self) {
        let mut state = self.lock();
        if state.live.remove(&ParticleSurface::Burst) {
            self.renderer.destroy(ParticleSurface::Burst);
            trace!("burst surface torn down");
        }
    }
}

#[cfg(test)]
#[path = "tests/effects_tests.rs"]
mod tests;
