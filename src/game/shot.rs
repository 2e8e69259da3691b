//! Shot controller
//!
//! Turns a vertical drag gesture into a launch impulse and owns the per
//! attempt bookkeeping: stroke counting, the pre-shot rest position used for
//! out-of-bounds recovery, rest-assist damping and stroke-limit detection.
//!
//! Drag distance alone decides shot strength; the drag's direction on screen
//! is irrelevant (a backward-looking drag still shoots forward). The launch
//! direction is the camera's forward vector flattened into the ground plane,
//! so every shot is horizontal.

use glam::Vec3;

use crate::consts::{DEACCELERATION_SPEED, DEACCELERATION_START, MAX_FORCE, SPEED_EPSILON};
use crate::flatten_forward;

use super::ports::{AudioSink, CameraRig, PhysicsBody, Presentation};

/// Pointer input for one frame tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer button went down this frame
    pub pointer_pressed: bool,
    /// Pointer button went up this frame
    pub pointer_released: bool,
    /// Current pointer vertical coordinate, in pixels
    pub pointer_height: f32,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_height: f32,
}

/// Per-attempt shot state and input handling.
///
/// Created with the level session and destroyed with it; a restart gets a
/// fresh controller with `stroke_count = 0`.
#[derive(Debug)]
pub struct ShotController {
    stroke_count: u32,
    stroke_limit: u32,
    /// Ball position at the start of the current shot; out-of-bounds exits
    /// reset here
    last_rest_position: Vec3,
    drag: Option<Drag>,
    level_resolved: bool,
    /// Latch so stroke-limit exhaustion is reported exactly once
    limit_reported: bool,
    max_force: f32,
}

impl ShotController {
    pub fn new(stroke_limit: u32, spawn_point: Vec3) -> Self {
        Self {
            stroke_count: 0,
            stroke_limit,
            last_rest_position: spawn_point,
            drag: None,
            level_resolved: false,
            limit_reported: false,
            max_force: MAX_FORCE,
        }
    }

    /// Override the impulse clamp (level tuning)
    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn stroke_count(&self) -> u32 {
        self.stroke_count
    }

    pub fn stroke_limit(&self) -> u32 {
        self.stroke_limit
    }

    pub fn last_rest_position(&self) -> Vec3 {
        self.last_rest_position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the attempt has been resolved (ball reached the hole)
    pub fn is_resolved(&self) -> bool {
        self.level_resolved
    }

    /// Mark the attempt resolved; suppresses all further shots and resets
    pub fn resolve(&mut self) {
        self.level_resolved = true;
    }

    /// Frame tick: capture the drag gesture.
    ///
    /// Orbit input is suspended while the drag is held so the gesture does
    /// not pan the camera. A release without a matching press (the press was
    /// consumed by UI, or happened outside gameplay) is ignored.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        camera: &mut dyn CameraRig,
        body: &mut dyn PhysicsBody,
        presentation: &mut dyn Presentation,
        audio: &mut dyn AudioSink,
    ) {
        if input.pointer_pressed {
            self.drag = Some(Drag {
                start_height: input.pointer_height,
            });
            camera.set_orbit_input_enabled(false);
        } else if input.pointer_released
            && let Some(drag) = self.drag.take()
        {
            camera.set_orbit_input_enabled(true);
            let offset = drag.start_height - input.pointer_height;
            self.launch(offset, camera, body, presentation, audio);
        }
    }

    /// Attempt a launch from a drag offset. Legality is checked here, at
    /// release time, because the ball may have started moving (or the level
    /// may have resolved) during the drag. Returns whether a shot was fired.
    pub fn launch(
        &mut self,
        offset: f32,
        camera: &dyn CameraRig,
        body: &mut dyn PhysicsBody,
        presentation: &mut dyn Presentation,
        audio: &mut dyn AudioSink,
    ) -> bool {
        if !body.is_at_rest() {
            log::debug!("Shot rejected: ball still in motion");
            return false;
        }
        if self.stroke_count == self.stroke_limit {
            log::debug!("Shot rejected: stroke limit reached");
            return false;
        }
        if self.level_resolved {
            log::debug!("Shot rejected: level already resolved");
            return false;
        }

        let Some(direction) = flatten_forward(camera.forward()) else {
            log::warn!("Shot rejected: camera forward has no horizontal component");
            return false;
        };

        // Captured before the impulse so an out-of-bounds exit can undo
        // this shot
        self.last_rest_position = body.position();

        // Drag direction carries no meaning, only distance
        let magnitude = offset.abs();
        let force = (direction * magnitude).clamp_length_max(self.max_force);
        body.apply_impulse(force);

        self.stroke_count += 1;
        presentation.update_stroke_count(self.stroke_count);
        audio.play_hit();
        log::info!(
            "Stroke {}/{} fired, impulse {:.1}",
            self.stroke_count,
            self.stroke_limit,
            force.length()
        );
        true
    }

    /// Fixed tick: rest-assist damping and stroke-limit detection.
    ///
    /// Returns `true` on the single step where stroke exhaustion is
    /// detected (limit reached, ball at rest, attempt unresolved).
    pub fn physics_step(&mut self, dt: f32, body: &mut dyn PhysicsBody) -> bool {
        self.damp_slow_roll(dt, body);

        if self.stroke_count == self.stroke_limit
            && body.is_at_rest()
            && !self.level_resolved
            && !self.limit_reported
        {
            self.limit_reported = true;
            log::info!("Stroke limit {} exhausted", self.stroke_limit);
            return true;
        }
        false
    }

    /// Help the ball come to a stop once it is merely creeping.
    ///
    /// Only fires in the open window (SPEED_EPSILON, DEACCELERATION_START):
    /// faster balls are rolling legitimately, and balls at or below the
    /// epsilon are left to the engine's own sleep logic.
    fn damp_slow_roll(&self, dt: f32, body: &mut dyn PhysicsBody) {
        let velocity = body.linear_velocity();
        let speed = velocity.length();
        if speed <= SPEED_EPSILON || speed >= DEACCELERATION_START {
            return;
        }

        let t = (DEACCELERATION_SPEED * dt).min(1.0);
        let keep = 1.0 - t;
        // Vertical component is dropped while settling
        body.set_linear_velocity(Vec3::new(velocity.x * keep, 0.0, velocity.z * keep));
        let angular = body.angular_velocity();
        body.set_angular_velocity(Vec3::new(angular.x * keep, 0.0, angular.z * keep));
    }

    /// The ball left the outer bounds volume: put it back where the current
    /// shot started and kill all motion. Costs no stroke.
    pub fn recover_out_of_bounds(&self, body: &mut dyn PhysicsBody) {
        log::info!("Ball out of bounds, resetting to {:?}", self.last_rest_position);
        body.set_position(self.last_rest_position);
        body.set_linear_velocity(Vec3::ZERO);
        body.set_angular_velocity(Vec3::ZERO);
    }
}
