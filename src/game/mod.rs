//! Tick-driven gameplay core
//!
//! All gameplay logic lives here. The core is single-threaded and
//! deterministic: a variable-rate frame tick (input, presentation, timers)
//! and a fixed-rate simulation tick (physics, rest checks) drive everything.
//! Rendering, audio playback, camera smoothing and the rigid-body integrator
//! are reached only through the collaborator contracts in [`ports`].

pub mod app;
pub mod ports;
pub mod session;
pub mod shot;

pub use app::{GameApp, GameAppBuilder, GameMode};
pub use ports::{
    AudioSink, CameraRig, LevelLoader, LoadPoll, PhysicsBody, Presentation, TriggerEvent,
    TriggerKind, TriggerVolume,
};
pub use session::{LevelSession, SessionEvent};
pub use shot::{FrameInput, ShotController};
