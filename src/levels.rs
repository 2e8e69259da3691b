//! Level catalog
//!
//! Static description of the course: one entry per level with its stroke
//! budget and ball spawn point. The default catalog is the built-in
//! seven-level course; a custom catalog can be deserialized from JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parameters for a single level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Display name
    pub name: String,
    /// Maximum strokes before the attempt fails
    pub stroke_limit: u32,
    /// Where the ball spawns (and resets to before the first stroke)
    pub spawn_point: Vec3,
}

impl LevelSpec {
    pub fn new(name: impl Into<String>, stroke_limit: u32, spawn_point: Vec3) -> Self {
        Self {
            name: name.into(),
            stroke_limit,
            spawn_point,
        }
    }
}

/// Ordered collection of levels; indices are 0-based everywhere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<LevelSpec>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        Self { levels }
    }

    pub fn get(&self, index: usize) -> Option<&LevelSpec> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelSpec> {
        self.levels.iter()
    }
}

impl Default for LevelCatalog {
    /// The built-in seven-level course
    fn default() -> Self {
        Self::new(vec![
            LevelSpec::new("Front Lawn", 3, Vec3::new(0.0, 0.5, 0.0)),
            LevelSpec::new("Dogleg", 3, Vec3::new(-4.0, 0.5, 0.0)),
            LevelSpec::new("The Ramp", 4, Vec3::new(0.0, 0.5, -6.0)),
            LevelSpec::new("Sandtrap Alley", 4, Vec3::new(2.0, 0.5, -8.0)),
            LevelSpec::new("Switchback", 5, Vec3::new(-6.0, 0.5, 2.0)),
            LevelSpec::new("The Narrows", 5, Vec3::new(0.0, 0.5, -12.0)),
            LevelSpec::new("Last Putt", 6, Vec3::new(8.0, 0.5, -10.0)),
        ])
    }
}
