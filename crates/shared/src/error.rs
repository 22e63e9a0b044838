use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::particles::ParticleSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Transport,
    Rendering,
    Internal,
}

/// Failure reported by a particle rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("particle engine is not ready")]
    EngineNotReady,
    #[error("surface {surface:?} failed: {reason}")]
    Surface {
        surface: ParticleSurface,
        reason: String,
    },
}

impl RenderError {
    pub fn surface(surface: ParticleSurface, reason: impl Into<String>) -> Self {
        Self::Surface {
            surface,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::Rendering
    }
}
