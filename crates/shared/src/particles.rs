//! Declarative particle parameter sets handed to the rendering engine.
//!
//! The renderer owns the simulation; these types only describe it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleSurface {
    /// Low density field shown for the whole session.
    Ambient,
    /// One-shot emission fired when the message is sealed.
    Burst,
    /// Dense field shown only on the completion screen.
    Finale,
}

impl ParticleSurface {
    pub fn id(self) -> &'static str {
        match self {
            ParticleSurface::Ambient => "oracle-ambient",
            ParticleSurface::Burst => "oracle-burst",
            ParticleSurface::Finale => "oracle-finale",
        }
    }

    pub fn profile(self) -> ParticleProfile {
        match self {
            ParticleSurface::Ambient => ParticleProfile::ambient(),
            ParticleSurface::Burst => ParticleProfile::burst(),
            ParticleSurface::Finale => ParticleProfile::finale(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub count: u32,
    /// Area the count is normalized against; `None` means an absolute count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Seconds the emitter stays alive.
    pub duration_secs: f32,
    /// Seconds between two emissions.
    pub delay_secs: f32,
    pub quantity: u32,
    /// Position in percent of the viewport.
    pub position: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleProfile {
    pub z_index: i32,
    pub density: Density,
    pub palette: Vec<String>,
    pub opacity: Range,
    pub size: Range,
    pub speed: Range,
    pub drift: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_secs: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitter: Option<Emitter>,
    pub shadow_color: String,
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|color| (*color).to_string()).collect()
}

impl ParticleProfile {
    pub fn ambient() -> Self {
        Self {
            z_index: 2,
            density: Density {
                count: 90,
                area: Some(900),
            },
            palette: palette(&["#ffffff", "#d1d5db", "#9ca3af"]),
            opacity: Range::new(0.08, 0.25),
            size: Range::new(1.0, 3.0),
            speed: Range::fixed(0.35),
            drift: 0.05,
            gravity: None,
            lifetime_secs: None,
            emitter: None,
            shadow_color: "#111827".into(),
        }
    }

    pub fn burst() -> Self {
        Self {
            z_index: 25,
            density: Density {
                count: 0,
                area: None,
            },
            palette: palette(&["#ffffff", "#e5e7eb", "#d1d5db", "#9ca3af"]),
            opacity: Range::new(0.6, 1.0),
            size: Range::new(2.0, 6.0),
            speed: Range::new(15.0, 35.0),
            drift: 0.0,
            gravity: Some(15.0),
            lifetime_secs: Some(Range::new(1.2, 1.8)),
            emitter: Some(Emitter {
                duration_secs: 0.2,
                delay_secs: 0.01,
                quantity: 120,
                position: (50.0, 50.0),
            }),
            shadow_color: "#7c2d12".into(),
        }
    }

    pub fn finale() -> Self {
        Self {
            z_index: 9999,
            density: Density {
                count: 220,
                area: Some(700),
            },
            palette: palette(&["#ffffff", "#e5e7eb", "#d1d5db"]),
            opacity: Range::new(0.25, 0.8),
            size: Range::new(1.0, 4.0),
            speed: Range::new(0.8, 2.2),
            drift: 0.1,
            gravity: None,
            lifetime_secs: None,
            emitter: None,
            shadow_color: "#111827".into(),
        }
    }

    /// True when the profile only emits for a bounded window.
    pub fn is_one_shot(&self) -> bool {
        self.emitter.is_some() && self.density.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_the_only_one_shot_profile() {
        assert!(ParticleSurface::Burst.profile().is_one_shot());
        assert!(!ParticleSurface::Ambient.profile().is_one_shot());
        assert!(!ParticleSurface::Finale.profile().is_one_shot());
    }

    #[test]
    fn burst_emits_120_over_a_short_window() {
        let emitter = ParticleProfile::burst().emitter.expect("burst emitter");
        assert_eq!(emitter.quantity, 120);
        assert!((emitter.duration_secs - 0.2).abs() < f32::EPSILON);
    }
}
