//! Collaborator contracts
//!
//! The gameplay core never talks to an engine directly. Everything it needs
//! from the outside world - panels, audio cues, the orbiting camera, the
//! rigid-body integrator, level loading - comes in through these traits,
//! supplied at construction time and validated once (a missing collaborator
//! is a fatal [`ConfigError`](crate::error::ConfigError)).

use glam::Vec3;

use crate::levels::LevelSpec;

/// Named trigger volumes a level must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerVolume {
    /// The cup; entering it completes the level
    Hole,
    /// The outer play area; leaving it puts the ball out of bounds
    Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Enter,
    Exit,
}

/// Overlap notification reported by the physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub volume: TriggerVolume,
    pub kind: TriggerKind,
}

/// UI panel and HUD surface.
///
/// `update_level_number` receives the 0-based level index; display
/// formatting is the presenter's business.
pub trait Presentation {
    fn show_main_menu(&mut self);
    fn show_settings(&mut self);
    fn show_level_selection(&mut self);
    fn show_hud(&mut self);
    fn show_pause_menu(&mut self);
    fn hide_pause_menu(&mut self);
    fn show_loading_screen(&mut self, progress: f32);
    fn hide_loading_screen(&mut self);
    fn update_stroke_count(&mut self, strokes: u32);
    fn update_level_number(&mut self, level: usize);
    fn set_level_lock(&mut self, level: usize, unlocked: bool);
}

/// Fire-and-forget audio cues plus volume control
pub trait AudioSink {
    fn play_hit(&mut self);
    fn play_hole_success(&mut self);
    fn set_music_volume(&mut self, volume: f32);
    fn set_sfx_volume(&mut self, volume: f32);
}

/// The orbiting follow camera.
///
/// Orbit input is suspended for the duration of a drag so the shot gesture
/// does not also pan the camera.
pub trait CameraRig {
    /// Current forward-facing direction (not necessarily horizontal)
    fn forward(&self) -> Vec3;
    /// Enable or disable the rig's own pointer-driven orbit axes
    fn set_orbit_input_enabled(&mut self, enabled: bool);
}

/// The ball's rigid body, as exposed by the external physics engine.
pub trait PhysicsBody {
    /// Advance the body's simulation by `dt` seconds
    fn step(&mut self, dt: f32);
    /// Apply an instantaneous impulse
    fn apply_impulse(&mut self, impulse: Vec3);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, velocity: Vec3);
    /// Whether the engine considers the body asleep
    fn is_at_rest(&self) -> bool;
    /// Take all trigger-volume events since the last call
    fn drain_trigger_events(&mut self) -> Vec<TriggerEvent>;
}

/// Result of polling an in-flight level load
pub enum LoadPoll {
    /// Still loading; fractional progress in 0.0 - 1.0
    Pending(f32),
    /// Load finished; hands over the ball's physics body
    Ready(Box<dyn PhysicsBody>),
}

/// Asynchronous level loading, polled once per frame tick.
pub trait LevelLoader {
    /// Start loading a level, replacing any load already in flight
    fn begin(&mut self, level: &LevelSpec);
    fn poll(&mut self) -> LoadPoll;
    /// Abandon the in-flight load, if any
    fn cancel(&mut self);
}

/// Shared recording fakes for the core's unit tests.
#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum PanelCall {
        MainMenu,
        Settings,
        LevelSelection,
        Hud,
        PauseShown,
        PauseHidden,
        Loading(f32),
        LoadingHidden,
        StrokeCount(u32),
        LevelNumber(usize),
        LevelLock(usize, bool),
    }

    /// Presentation fake that records every call
    #[derive(Default)]
    pub struct PanelLog {
        pub calls: Rc<RefCell<Vec<PanelCall>>>,
    }

    impl PanelLog {
        pub fn handle(&self) -> Rc<RefCell<Vec<PanelCall>>> {
            Rc::clone(&self.calls)
        }
    }

    impl Presentation for PanelLog {
        fn show_main_menu(&mut self) {
            self.calls.borrow_mut().push(PanelCall::MainMenu);
        }
        fn show_settings(&mut self) {
            self.calls.borrow_mut().push(PanelCall::Settings);
        }
        fn show_level_selection(&mut self) {
            self.calls.borrow_mut().push(PanelCall::LevelSelection);
        }
        fn show_hud(&mut self) {
            self.calls.borrow_mut().push(PanelCall::Hud);
        }
        fn show_pause_menu(&mut self) {
            self.calls.borrow_mut().push(PanelCall::PauseShown);
        }
        fn hide_pause_menu(&mut self) {
            self.calls.borrow_mut().push(PanelCall::PauseHidden);
        }
        fn show_loading_screen(&mut self, progress: f32) {
            self.calls.borrow_mut().push(PanelCall::Loading(progress));
        }
        fn hide_loading_screen(&mut self) {
            self.calls.borrow_mut().push(PanelCall::LoadingHidden);
        }
        fn update_stroke_count(&mut self, strokes: u32) {
            self.calls.borrow_mut().push(PanelCall::StrokeCount(strokes));
        }
        fn update_level_number(&mut self, level: usize) {
            self.calls.borrow_mut().push(PanelCall::LevelNumber(level));
        }
        fn set_level_lock(&mut self, level: usize, unlocked: bool) {
            self.calls
                .borrow_mut()
                .push(PanelCall::LevelLock(level, unlocked));
        }
    }

    #[derive(Debug, Default)]
    pub struct AudioCalls {
        pub hits: u32,
        pub holes: u32,
        pub music_volume: f32,
        pub sfx_volume: f32,
    }

    /// Audio fake counting cues and remembering volumes
    #[derive(Default)]
    pub struct CueLog {
        pub state: Rc<RefCell<AudioCalls>>,
    }

    impl CueLog {
        pub fn handle(&self) -> Rc<RefCell<AudioCalls>> {
            Rc::clone(&self.state)
        }
    }

    impl AudioSink for CueLog {
        fn play_hit(&mut self) {
            self.state.borrow_mut().hits += 1;
        }
        fn play_hole_success(&mut self) {
            self.state.borrow_mut().holes += 1;
        }
        fn set_music_volume(&mut self, volume: f32) {
            self.state.borrow_mut().music_volume = volume;
        }
        fn set_sfx_volume(&mut self, volume: f32) {
            self.state.borrow_mut().sfx_volume = volume;
        }
    }

    #[derive(Debug)]
    pub struct RigState {
        pub forward: Vec3,
        pub orbit_enabled: bool,
    }

    impl Default for RigState {
        fn default() -> Self {
            Self {
                forward: Vec3::new(0.0, -0.4, 1.0),
                orbit_enabled: true,
            }
        }
    }

    /// Camera fake with a settable forward vector
    #[derive(Default)]
    pub struct StubRig {
        pub state: Rc<RefCell<RigState>>,
    }

    impl StubRig {
        pub fn handle(&self) -> Rc<RefCell<RigState>> {
            Rc::clone(&self.state)
        }
    }

    impl CameraRig for StubRig {
        fn forward(&self) -> Vec3 {
            self.state.borrow().forward
        }
        fn set_orbit_input_enabled(&mut self, enabled: bool) {
            self.state.borrow_mut().orbit_enabled = enabled;
        }
    }

    #[derive(Debug)]
    pub struct BodyState {
        pub position: Vec3,
        pub linear_velocity: Vec3,
        pub angular_velocity: Vec3,
        pub at_rest: bool,
        pub impulses: Vec<Vec3>,
        pub queued: Vec<TriggerEvent>,
        pub steps: u32,
    }

    impl Default for BodyState {
        fn default() -> Self {
            Self {
                position: Vec3::ZERO,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                at_rest: true,
                impulses: Vec::new(),
                queued: Vec::new(),
                steps: 0,
            }
        }
    }

    impl BodyState {
        pub fn push_trigger(&mut self, volume: TriggerVolume, kind: TriggerKind) {
            self.queued.push(TriggerEvent { volume, kind });
        }
    }

    /// Physics fake. Applying an impulse marks the body as moving; tests
    /// flip `at_rest` back to simulate the ball settling.
    #[derive(Default)]
    pub struct ScriptedBody {
        pub state: Rc<RefCell<BodyState>>,
    }

    impl ScriptedBody {
        pub fn shared(state: Rc<RefCell<BodyState>>) -> Self {
            Self { state }
        }

        pub fn handle(&self) -> Rc<RefCell<BodyState>> {
            Rc::clone(&self.state)
        }
    }

    impl PhysicsBody for ScriptedBody {
        fn step(&mut self, _dt: f32) {
            self.state.borrow_mut().steps += 1;
        }
        fn apply_impulse(&mut self, impulse: Vec3) {
            let mut state = self.state.borrow_mut();
            state.impulses.push(impulse);
            state.linear_velocity += impulse;
            state.at_rest = false;
        }
        fn position(&self) -> Vec3 {
            self.state.borrow().position
        }
        fn set_position(&mut self, position: Vec3) {
            self.state.borrow_mut().position = position;
        }
        fn linear_velocity(&self) -> Vec3 {
            self.state.borrow().linear_velocity
        }
        fn set_linear_velocity(&mut self, velocity: Vec3) {
            self.state.borrow_mut().linear_velocity = velocity;
        }
        fn angular_velocity(&self) -> Vec3 {
            self.state.borrow().angular_velocity
        }
        fn set_angular_velocity(&mut self, velocity: Vec3) {
            self.state.borrow_mut().angular_velocity = velocity;
        }
        fn is_at_rest(&self) -> bool {
            self.state.borrow().at_rest
        }
        fn drain_trigger_events(&mut self) -> Vec<TriggerEvent> {
            std::mem::take(&mut self.state.borrow_mut().queued)
        }
    }

    #[derive(Debug)]
    pub struct LoaderState {
        /// Frames a load takes before completing
        pub delay_frames: u32,
        pub remaining: Option<u32>,
        pub begun: u32,
        pub cancelled: u32,
    }

    impl Default for LoaderState {
        fn default() -> Self {
            Self {
                delay_frames: 0,
                remaining: None,
                begun: 0,
                cancelled: 0,
            }
        }
    }

    /// Loader fake that completes after a configurable number of polls and
    /// hands out bodies sharing a single observable state.
    pub struct FrameLoader {
        pub state: Rc<RefCell<LoaderState>>,
        pub body: Rc<RefCell<BodyState>>,
    }

    impl FrameLoader {
        pub fn new(delay_frames: u32) -> Self {
            let state = LoaderState {
                delay_frames,
                ..Default::default()
            };
            Self {
                state: Rc::new(RefCell::new(state)),
                body: Rc::new(RefCell::new(BodyState::default())),
            }
        }

        pub fn handle(&self) -> Rc<RefCell<LoaderState>> {
            Rc::clone(&self.state)
        }

        pub fn body_handle(&self) -> Rc<RefCell<BodyState>> {
            Rc::clone(&self.body)
        }
    }

    impl LevelLoader for FrameLoader {
        fn begin(&mut self, level: &LevelSpec) {
            let mut state = self.state.borrow_mut();
            state.begun += 1;
            state.remaining = Some(state.delay_frames);
            let mut body = self.body.borrow_mut();
            body.position = level.spawn_point;
            body.linear_velocity = Vec3::ZERO;
            body.angular_velocity = Vec3::ZERO;
            body.at_rest = true;
            body.queued.clear();
        }

        fn poll(&mut self) -> LoadPoll {
            let mut state = self.state.borrow_mut();
            match state.remaining {
                Some(0) | None => {
                    state.remaining = None;
                    LoadPoll::Ready(Box::new(ScriptedBody::shared(Rc::clone(&self.body))))
                }
                Some(n) => {
                    state.remaining = Some(n - 1);
                    let done = state.delay_frames - n;
                    LoadPoll::Pending(done as f32 / state.delay_frames as f32)
                }
            }
        }

        fn cancel(&mut self) {
            let mut state = self.state.borrow_mut();
            if state.remaining.take().is_some() {
                state.cancelled += 1;
            }
        }
    }
}
