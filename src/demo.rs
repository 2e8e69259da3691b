//! Headless demo collaborators
//!
//! Simple implementations of the collaborator contracts, enough to drive a
//! full scripted playthrough from the native binary without a renderer:
//! log-backed panels and audio cues, a fixed camera rig, a kinematic demo
//! ball with hole and bounds trigger volumes, and a loader that completes
//! after a fixed number of polls.

use glam::Vec3;

use crate::game::ports::{
    AudioSink, CameraRig, LevelLoader, LoadPoll, PhysicsBody, Presentation, TriggerEvent,
    TriggerKind, TriggerVolume,
};
use crate::levels::LevelSpec;

/// Exponential rolling friction for the demo ball, per second
const FRICTION: f32 = 1.2;
/// Impulse-to-velocity scale (stands in for inverse ball mass)
const IMPULSE_SCALE: f32 = 0.02;
/// Below this speed the demo ball snaps to rest
const REST_SPEED: f32 = 0.05;
/// The demo hole sits this far down-range from the spawn point
const HOLE_DISTANCE: f32 = 4.0;
const HOLE_RADIUS: f32 = 0.6;
/// Half extent of the square bounds volume around the spawn point
const BOUNDS_HALF_EXTENT: f32 = 25.0;

/// Presentation that narrates panel changes to the log
#[derive(Default)]
pub struct LogPanels;

impl Presentation for LogPanels {
    fn show_main_menu(&mut self) {
        log::info!("[ui] main menu");
    }
    fn show_settings(&mut self) {
        log::info!("[ui] settings");
    }
    fn show_level_selection(&mut self) {
        log::info!("[ui] level selection");
    }
    fn show_hud(&mut self) {
        log::info!("[ui] hud");
    }
    fn show_pause_menu(&mut self) {
        log::info!("[ui] pause menu shown");
    }
    fn hide_pause_menu(&mut self) {
        log::info!("[ui] pause menu hidden");
    }
    fn show_loading_screen(&mut self, progress: f32) {
        log::info!("[ui] loading {:.0}%", progress * 100.0);
    }
    fn hide_loading_screen(&mut self) {
        log::info!("[ui] loading done");
    }
    fn update_stroke_count(&mut self, strokes: u32) {
        log::info!("[ui] strokes: {strokes}");
    }
    fn update_level_number(&mut self, level: usize) {
        log::info!("[ui] level: {}", level + 1);
    }
    fn set_level_lock(&mut self, level: usize, unlocked: bool) {
        log::info!(
            "[ui] level {} {}",
            level + 1,
            if unlocked { "unlocked" } else { "locked" }
        );
    }
}

/// Audio sink that narrates cues to the log
#[derive(Default)]
pub struct LogCues {
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioSink for LogCues {
    fn play_hit(&mut self) {
        log::info!("[audio] hit (sfx {:.2})", self.sfx_volume);
    }
    fn play_hole_success(&mut self) {
        log::info!("[audio] hole! (sfx {:.2})", self.sfx_volume);
    }
    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume;
    }
    fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume;
    }
}

/// Fixed camera rig looking down-range with a slight downward tilt
pub struct TiltedRig {
    forward: Vec3,
    orbit_enabled: bool,
}

impl Default for TiltedRig {
    fn default() -> Self {
        Self {
            forward: Vec3::new(0.0, -0.35, 1.0),
            orbit_enabled: true,
        }
    }
}

impl CameraRig for TiltedRig {
    fn forward(&self) -> Vec3 {
        self.forward
    }
    fn set_orbit_input_enabled(&mut self, enabled: bool) {
        if self.orbit_enabled != enabled {
            log::debug!("[camera] orbit input {}", if enabled { "on" } else { "off" });
        }
        self.orbit_enabled = enabled;
    }
}

/// Kinematic demo ball on a flat green: exponential rolling friction, snap
/// to rest below a threshold, sphere hole trigger and square bounds trigger.
pub struct DemoBall {
    position: Vec3,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    at_rest: bool,
    hole_center: Vec3,
    bounds_center: Vec3,
    in_hole: bool,
    in_bounds: bool,
    events: Vec<TriggerEvent>,
}

impl DemoBall {
    pub fn for_level(level: &LevelSpec) -> Self {
        Self {
            position: level.spawn_point,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            at_rest: true,
            hole_center: level.spawn_point + Vec3::Z * HOLE_DISTANCE,
            bounds_center: level.spawn_point,
            in_hole: false,
            in_bounds: true,
            events: Vec::new(),
        }
    }

    fn update_triggers(&mut self) {
        let in_hole = (self.position - self.hole_center).length() < HOLE_RADIUS;
        if in_hole != self.in_hole {
            self.in_hole = in_hole;
            self.events.push(TriggerEvent {
                volume: TriggerVolume::Hole,
                kind: if in_hole {
                    TriggerKind::Enter
                } else {
                    TriggerKind::Exit
                },
            });
        }

        let offset = self.position - self.bounds_center;
        let in_bounds =
            offset.x.abs() < BOUNDS_HALF_EXTENT && offset.z.abs() < BOUNDS_HALF_EXTENT;
        if in_bounds != self.in_bounds {
            self.in_bounds = in_bounds;
            self.events.push(TriggerEvent {
                volume: TriggerVolume::Bounds,
                kind: if in_bounds {
                    TriggerKind::Enter
                } else {
                    TriggerKind::Exit
                },
            });
        }
    }
}

impl PhysicsBody for DemoBall {
    fn step(&mut self, dt: f32) {
        if self.at_rest {
            return;
        }
        self.position += self.linear_velocity * dt;
        let keep = (1.0 - FRICTION * dt).max(0.0);
        self.linear_velocity *= keep;
        self.angular_velocity *= keep;
        if self.linear_velocity.length() < REST_SPEED {
            self.linear_velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
            self.at_rest = true;
        }
        self.update_triggers();
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.linear_velocity += impulse * IMPULSE_SCALE;
        // Rough rolling spin around the axis perpendicular to travel
        self.angular_velocity += Vec3::new(impulse.z, 0.0, -impulse.x) * IMPULSE_SCALE;
        self.at_rest = false;
    }

    fn position(&self) -> Vec3 {
        self.position
    }
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_triggers();
    }
    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
        if velocity == Vec3::ZERO {
            self.at_rest = true;
        }
    }
    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }
    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }
    fn is_at_rest(&self) -> bool {
        self.at_rest
    }
    fn drain_trigger_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Loader that "streams" a level over a fixed number of polls
pub struct DemoLoader {
    polls_per_load: u32,
    remaining: Option<u32>,
    pending: Option<LevelSpec>,
}

impl DemoLoader {
    pub fn new(polls_per_load: u32) -> Self {
        Self {
            polls_per_load,
            remaining: None,
            pending: None,
        }
    }
}

impl LevelLoader for DemoLoader {
    fn begin(&mut self, level: &LevelSpec) {
        self.remaining = Some(self.polls_per_load);
        self.pending = Some(level.clone());
    }

    fn poll(&mut self) -> LoadPoll {
        match self.remaining {
            Some(0) | None => {
                self.remaining = None;
                let level = self.pending.take().unwrap_or_else(|| {
                    LevelSpec::new("fallback", 3, Vec3::new(0.0, 0.5, 0.0))
                });
                LoadPoll::Ready(Box::new(DemoBall::for_level(&level)))
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                let done = self.polls_per_load - n;
                LoadPoll::Pending(done as f32 / self.polls_per_load as f32)
            }
        }
    }

    fn cancel(&mut self) {
        if self.remaining.take().is_some() {
            log::debug!("[loader] in-flight load cancelled");
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn test_level() -> LevelSpec {
        LevelSpec::new("Demo Green", 3, Vec3::new(0.0, 0.5, 0.0))
    }

    #[test]
    fn test_ball_rolls_to_rest() {
        let mut ball = DemoBall::for_level(&test_level());
        ball.apply_impulse(Vec3::Z * 100.0);
        assert!(!ball.is_at_rest());
        for _ in 0..(10.0 / SIM_DT) as u32 {
            ball.step(SIM_DT);
        }
        assert!(ball.is_at_rest());
        assert_eq!(ball.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_straight_shot_finds_the_hole() {
        let mut ball = DemoBall::for_level(&test_level());
        ball.apply_impulse(Vec3::Z * 250.0);
        let mut entered = false;
        for _ in 0..(15.0 / SIM_DT) as u32 {
            ball.step(SIM_DT);
            if ball
                .drain_trigger_events()
                .iter()
                .any(|e| e.volume == TriggerVolume::Hole && e.kind == TriggerKind::Enter)
            {
                entered = true;
                break;
            }
        }
        assert!(entered, "a full-strength straight shot must reach the hole");
    }

    #[test]
    fn test_leaving_bounds_emits_exit() {
        let mut ball = DemoBall::for_level(&test_level());
        ball.set_position(Vec3::new(BOUNDS_HALF_EXTENT + 1.0, 0.5, 0.0));
        let events = ball.drain_trigger_events();
        assert!(events.contains(&TriggerEvent {
            volume: TriggerVolume::Bounds,
            kind: TriggerKind::Exit,
        }));
    }

    #[test]
    fn test_loader_reports_progress_then_ready() {
        let mut loader = DemoLoader::new(2);
        loader.begin(&test_level());
        assert!(matches!(loader.poll(), LoadPoll::Pending(p) if p == 0.0));
        assert!(matches!(loader.poll(), LoadPoll::Pending(p) if p > 0.0));
        assert!(matches!(loader.poll(), LoadPoll::Ready(_)));
    }
}
