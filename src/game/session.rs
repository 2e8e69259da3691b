//! Level session lifecycle
//!
//! One `LevelSession` exists per level attempt: created when the level's
//! asynchronous load hands over the ball's physics body, dropped on restart,
//! completion or menu exit. The hole-completion settle delay lives on the
//! session, so tearing the session down cancels it - a stale completion can
//! never fire against a later attempt.

use crate::consts::LEVEL_COMPLETE_WAIT;
use crate::levels::LevelSpec;

use super::ports::{AudioSink, CameraRig, PhysicsBody, Presentation, TriggerEvent, TriggerKind, TriggerVolume};
use super::shot::{FrameInput, ShotController};

/// Outcome a session reports up to the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Strokes exhausted without reaching the hole; the level restarts
    StrokeLimitReached,
    /// The ball reached the hole and the settle delay elapsed
    Completed,
}

/// A live level attempt: the ball's body, the shot controller and any
/// pending settle delay.
pub struct LevelSession {
    level_index: usize,
    body: Box<dyn PhysicsBody>,
    shot: ShotController,
    /// Seconds until completion fires, once the hole has been entered
    settle_remaining: Option<f32>,
    settle_wait: f32,
}

impl LevelSession {
    pub fn new(level_index: usize, level: &LevelSpec, body: Box<dyn PhysicsBody>) -> Self {
        Self {
            level_index,
            body,
            shot: ShotController::new(level.stroke_limit, level.spawn_point),
            settle_remaining: None,
            settle_wait: LEVEL_COMPLETE_WAIT,
        }
    }

    /// Override the settle delay (tuning / tests)
    pub fn with_settle_wait(mut self, seconds: f32) -> Self {
        self.settle_wait = seconds;
        self
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    /// Whether a completion delay is currently pending
    pub fn is_settling(&self) -> bool {
        self.settle_remaining.is_some()
    }

    /// Frame tick: drag capture plus the cooperative settle countdown.
    ///
    /// `dt` arrives already scaled by the global time multiplier, so pausing
    /// freezes the countdown along with everything else.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        dt: f32,
        camera: &mut dyn CameraRig,
        presentation: &mut dyn Presentation,
        audio: &mut dyn AudioSink,
    ) -> Option<SessionEvent> {
        self.shot
            .frame(input, camera, &mut *self.body, presentation, audio);

        if let Some(remaining) = &mut self.settle_remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.settle_remaining = None;
                log::info!("Level {} completed", self.level_index);
                return Some(SessionEvent::Completed);
            }
        }
        None
    }

    /// Fixed tick: advance the body, route trigger events, then run the
    /// shot controller's rest checks.
    pub fn fixed_step(&mut self, dt: f32, audio: &mut dyn AudioSink) -> Option<SessionEvent> {
        self.body.step(dt);

        for event in self.body.drain_trigger_events() {
            self.handle_trigger(event, audio);
        }

        if self.shot.physics_step(dt, &mut *self.body) {
            return Some(SessionEvent::StrokeLimitReached);
        }
        None
    }

    fn handle_trigger(&mut self, event: TriggerEvent, audio: &mut dyn AudioSink) {
        match (event.volume, event.kind) {
            (TriggerVolume::Hole, TriggerKind::Enter) => {
                if self.shot.is_resolved() {
                    return;
                }
                self.shot.resolve();
                audio.play_hole_success();
                self.settle_remaining = Some(self.settle_wait);
                log::info!(
                    "Ball in the hole on level {}, settling for {:.1}s",
                    self.level_index,
                    self.settle_wait
                );
            }
            (TriggerVolume::Bounds, TriggerKind::Exit) => {
                self.shot.recover_out_of_bounds(&mut *self.body);
            }
            _ => {}
        }
    }
}
