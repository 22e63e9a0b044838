//! Runtime of the contact ritual: the step state machine, its validation gate,
//! the audio/particle orchestration and the outgoing notification.

pub mod audio;
pub mod controller;
pub mod effects;
pub mod engine;
pub mod error;
pub mod error_flag;
pub mod notifier;
pub mod timer;
pub mod transitions;
pub mod validation;

pub use audio::{AudioChannel, AudioCue, AudioService, CueSource};
pub use controller::{KeyInput, Outcome, StepController};
pub use effects::{EffectOrchestrator, EffectRequest};
pub use engine::{EngineLoader, EngineReady, ParticleEngine, ParticleRenderer};
pub use error::DispatchError;
pub use error_flag::ErrorFlag;
pub use notifier::{LogDispatcher, NotificationDispatcher, WebhookDispatcher};
pub use timer::{FlowTimings, TimerSlot};
pub use transitions::{Operation, TransitionRequest};
pub use validation::is_valid_email;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
