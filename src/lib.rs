//! Fairway - a drag-to-shoot mini golf game core
//!
//! Core modules:
//! - `game`: Tick-driven gameplay core (mode state machine, shot controller,
//!   level sessions, collaborator contracts)
//! - `progress`: Unlocked-level watermark and volume settings persistence
//! - `levels`: Level catalog (stroke limits, spawn points)
//! - `demo`: Headless collaborator implementations used by the binary
//! - `error`: Error taxonomy

pub mod demo;
pub mod error;
pub mod game;
pub mod levels;
pub mod progress;

pub use error::{ConfigError, PersistenceError};
pub use game::{GameApp, GameMode};
pub use levels::{LevelCatalog, LevelSpec};
pub use progress::{ProgressRecord, Progression};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (matches the physics step of the course)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Maximum launch impulse magnitude; stronger drags are clamped
    pub const MAX_FORCE: f32 = 350.0;

    /// Speeds at or below this are treated as already stopped
    pub const SPEED_EPSILON: f32 = 0.01;
    /// Rest-assist damping engages below this linear speed
    pub const DEACCELERATION_START: f32 = 0.1;
    /// Damping rate (per second) applied inside the slow window
    pub const DEACCELERATION_SPEED: f32 = 2.5;

    /// Delay between the ball entering the hole and level completion
    pub const LEVEL_COMPLETE_WAIT: f32 = 2.0;

    /// Horizontal length below which a camera forward vector is considered
    /// degenerate (looking straight up or down)
    pub const FORWARD_FLAT_EPSILON: f32 = 1e-4;
}

/// Flatten a camera forward vector into a ground-plane unit vector.
///
/// Returns `None` when the forward direction has no usable horizontal
/// component (camera looking straight up or down).
#[inline]
pub fn flatten_forward(forward: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if flat.length() < consts::FORWARD_FLAT_EPSILON {
        return None;
    }
    Some(flat.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_forward_is_horizontal_unit() {
        let dir = flatten_forward(Vec3::new(0.3, -0.8, 0.5)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_flatten_forward_rejects_vertical() {
        assert!(flatten_forward(Vec3::NEG_Y).is_none());
        assert!(flatten_forward(Vec3::new(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_flatten_forward_preserves_heading() {
        let dir = flatten_forward(Vec3::new(1.0, -2.0, 1.0)).unwrap();
        assert!((dir.x - dir.z).abs() < 1e-6);
        assert!(dir.x > 0.0);
    }
}
