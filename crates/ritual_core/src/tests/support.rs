//! Recording collaborators shared by the unit tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::FormRecord,
    error::RenderError,
    particles::{ParticleProfile, ParticleSurface},
};

use crate::{
    audio::{AudioCue, AudioService},
    controller::StepController,
    effects::EffectOrchestrator,
    engine::{EngineLoader, EngineReady, ParticleEngine, ParticleRenderer},
    notifier::NotificationDispatcher,
    timer::FlowTimings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AudioEvent {
    Play(AudioCue),
    Stop(AudioCue),
}

#[derive(Default)]
pub(crate) struct RecordingAudio {
    events: Mutex<Vec<AudioEvent>>,
    playing: Mutex<HashSet<AudioCue>>,
}

impl RecordingAudio {
    pub(crate) fn events(&self) -> Vec<AudioEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn plays(&self, cue: AudioCue) -> usize {
        self.events()
            .into_iter()
            .filter(|event| *event == AudioEvent::Play(cue))
            .count()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl AudioService for RecordingAudio {
    fn play(&self, cue: AudioCue) {
        self.events.lock().unwrap().push(AudioEvent::Play(cue));
        if cue.is_loop() {
            self.playing.lock().unwrap().insert(cue);
        }
    }

    fn stop(&self, cue: AudioCue) {
        self.events.lock().unwrap().push(AudioEvent::Stop(cue));
        self.playing.lock().unwrap().remove(&cue);
    }

    fn is_playing(&self, cue: AudioCue) -> bool {
        self.playing.lock().unwrap().contains(&cue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderEvent {
    Load(ParticleSurface),
    Destroy(ParticleSurface),
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
    failing: Mutex<HashSet<ParticleSurface>>,
}

impl RecordingRenderer {
    pub(crate) fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn fail_on(&self, surface: ParticleSurface) {
        self.failing.lock().unwrap().insert(surface);
    }
}

impl ParticleRenderer for RecordingRenderer {
    fn load(&self, surface: ParticleSurface, _profile: &ParticleProfile) -> Result<(), RenderError> {
        if self.failing.lock().unwrap().contains(&surface) {
            return Err(RenderError::surface(surface, "canvas unavailable"));
        }
        self.events.lock().unwrap().push(RenderEvent::Load(surface));
        Ok(())
    }

    fn destroy(&self, surface: ParticleSurface) {
        self.events.lock().unwrap().push(RenderEvent::Destroy(surface));
    }
}

#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    records: Mutex<Vec<FormRecord>>,
}

impl RecordingDispatcher {
    pub(crate) fn records(&self) -> Vec<FormRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, record: &FormRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

pub(crate) struct InstantLoader;

#[async_trait]
impl EngineLoader for InstantLoader {
    async fn load(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub(crate) async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

pub(crate) struct Harness {
    pub(crate) audio: Arc<RecordingAudio>,
    pub(crate) renderer: Arc<RecordingRenderer>,
    pub(crate) dispatcher: Arc<RecordingDispatcher>,
    pub(crate) engine: Arc<ParticleEngine>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            audio: Arc::new(RecordingAudio::default()),
            renderer: Arc::new(RecordingRenderer::default()),
            dispatcher: Arc::new(RecordingDispatcher::default()),
            engine: ParticleEngine::new(Arc::new(InstantLoader)),
        }
    }

    pub(crate) fn orchestrator(&self) -> EffectOrchestrator {
        self.orchestrator_with(self.engine.ready_signal())
    }

    pub(crate) fn orchestrator_with(&self, ready: EngineReady) -> EffectOrchestrator {
        EffectOrchestrator::new(
            self.audio.clone(),
            self.renderer.clone(),
            ready,
            FlowTimings::default(),
        )
    }

    pub(crate) fn controller(&self) -> StepController {
        StepController::new(
            self.orchestrator(),
            self.dispatcher.clone(),
            FlowTimings::default(),
        )
    }
}
