//! Particle engine lifecycle and rendering seam.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    error::RenderError,
    particles::{ParticleProfile, ParticleSurface},
};
use tokio::sync::{watch, OnceCell};
use tracing::{info, warn};

/// One-time asynchronous setup of the rendering engine (plugin loading, etc).
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> anyhow::Result<()>;
}

/// Rendering collaborator. Surfaces are keyed by id; loading a surface that is
/// already live replaces it.
pub trait ParticleRenderer: Send + Sync {
    fn load(&self, surface: ParticleSurface, profile: &ParticleProfile) -> Result<(), RenderError>;
    fn destroy(&self, surface: ParticleSurface);
}

/// Owns the engine initialization for the whole process.
///
/// `initialize` runs the loader at most once, however many callers race on
/// it. The ready signal flips to `true` once and never goes back.
pub struct ParticleEngine {
    loader: Arc<dyn EngineLoader>,
    outcome: OnceCell<bool>,
    ready_tx: watch::Sender<bool>,
}

impl ParticleEngine {
    pub fn new(loader: Arc<dyn EngineLoader>) -> Arc<Self> {
        let (ready_tx, _) = watch::channel(false);
        Arc::new(Self {
            loader,
            outcome: OnceCell::new(),
            ready_tx,
        })
    }

    /// Returns whether the engine is usable. A failed load is not retried.
    pub async fn initialize(&self) -> bool {
        *self
            .outcome
            .get_or_init(|| async {
                match self.loader.load().await {
                    Ok(()) => {
                        self.ready_tx.send_replace(true);
                        info!("particle engine ready");
                        true
                    }
                    Err(error) => {
                        warn!(%error, "particle engine failed to initialize; particle effects disabled");
                        false
                    }
                }
            })
            .await
    }

    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    pub fn ready_signal(&self) -> EngineReady {
        EngineReady {
            rx: self.ready_tx.subscribe(),
        }
    }
}

/// Receiving end of the engine-ready signal, handed to consumers.
#[derive(Clone)]
pub struct EngineReady {
    rx: watch::Receiver<bool>,
}

impl EngineReady {
    /// A signal that has already fired.
    pub fn immediate() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves `true` once the engine is ready, or `false` if the engine
    /// went away without ever becoming ready.
    pub async fn wait(mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}
