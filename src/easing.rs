//! Steering/seek model that eases the displayed temperature toward its target.
//!
//! The controller is a two-state machine. `seek` moves it to
//! [`Phase::Animating`]; every tick then runs [`step`] until the value has
//! settled inside the deadband, at which point it drops back to
//! [`Phase::Idle`] and the host can stop its timer.

use tracing::{debug, trace};

/// Upper bound on `|velocity|`, in degrees per tick.
pub const MAX_SPEED: f64 = 4.0;
/// Upper bound on the steering force applied in a single tick.
pub const MAX_FORCE: f64 = 0.2;
/// Velocity and distance below which the value counts as settled.
pub const DEADBAND: f64 = 0.1;
/// Distance from the target inside which the desired speed ramps down linearly.
pub const DAMPING_ZONE: f64 = 15.0;
/// Rate the tick source is expected to run at.
pub const TICKS_PER_SECOND: f64 = 30.0;

/// Simulation state of the mercury column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermometerState {
    pub value: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub target: f64,
}

impl ThermometerState {
    /// A column at rest on `value`, already aimed at it.
    pub fn at_rest(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
            acceleration: 0.0,
            target: value,
        }
    }

    fn settled(&self) -> bool {
        self.velocity.abs() < DEADBAND && (self.value - self.target).abs() < DEADBAND
    }
}

/// Whether the tick source should be running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating,
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: ThermometerState,
    pub repaint: bool,
    pub running: bool,
}

/// Advance the simulation by one fixed time step toward `target`.
///
/// Once settled the state is returned untouched with `running == false`; the
/// exact target is usually never hit, only approached within [`DEADBAND`].
pub fn step(state: ThermometerState, target: f64) -> Step {
    let mut next = ThermometerState { target, ..state };
    if next.settled() {
        return Step {
            state: next,
            repaint: false,
            running: false,
        };
    }

    let gap = next.target - next.value;
    // Only the upward approach saturates; a large downward gap still yields a
    // steep desired speed and the force limit does the rest.
    let desired = if gap > DAMPING_ZONE {
        gap.signum() * MAX_SPEED
    } else {
        gap / DAMPING_ZONE * MAX_SPEED
    };
    let steer = (desired - next.velocity).clamp(-MAX_FORCE, MAX_FORCE);
    next.acceleration += steer;

    next.velocity = (next.velocity + next.acceleration).clamp(-MAX_SPEED, MAX_SPEED);
    next.value += next.velocity;
    next.acceleration = 0.0;

    Step {
        state: next,
        repaint: true,
        running: true,
    }
}

/// Owns the simulation state and the lifecycle of the tick source
#[derive(Debug, Clone)]
pub struct EasingController {
    state: ThermometerState,
    phase: Phase,
}

impl EasingController {
    pub fn new(initial: f64) -> Self {
        Self {
            state: ThermometerState::at_rest(initial),
            phase: Phase::Idle,
        }
    }

    /// Aim at a new set-point. Returns `true` when the tick source was idle
    /// and must now be started; while animating only the target changes.
    pub fn seek(&mut self, target: f64) -> bool {
        self.state.target = target;
        match self.phase {
            Phase::Animating => false,
            Phase::Idle => {
                debug!(target, value = self.state.value, "starting tick source");
                self.phase = Phase::Animating;
                true
            }
        }
    }

    /// Run one tick. Returns whether the widget needs a repaint.
    pub fn tick(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        let Step {
            state,
            repaint,
            running,
        } = step(self.state, self.state.target);
        self.state = state;
        if running {
            trace!(value = state.value, velocity = state.velocity, "tick");
        } else {
            debug!(value = state.value, target = state.target, "settled, stopping tick source");
            self.phase = Phase::Idle;
        }
        repaint
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    pub fn state(&self) -> ThermometerState {
        self.state
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn target(&self) -> f64 {
        self.state.target
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_step_from_rest_applies_max_force() {
        let out = step(ThermometerState::at_rest(-40.0), 20.0);
        assert!(out.running);
        assert!(out.repaint);
        assert_relative_eq!(out.state.velocity, MAX_FORCE);
        assert_relative_eq!(out.state.value, -40.0 + MAX_FORCE);
        assert_eq!(out.state.acceleration, 0.0);
        assert_eq!(out.state.target, 20.0);
    }

    #[test]
    fn settled_state_is_returned_untouched() {
        let state = ThermometerState {
            value: 19.95,
            velocity: 0.05,
            acceleration: 0.0,
            target: 20.0,
        };
        let out = step(state, 20.0);
        assert!(!out.running);
        assert!(!out.repaint);
        assert_eq!(out.state, state);
    }

    #[test]
    fn damping_zone_scales_desired_speed() {
        // 7.5 below the target, desired speed is half of MAX_SPEED; from rest
        // the steering force is still capped.
        let out = step(ThermometerState::at_rest(12.5), 20.0);
        assert_relative_eq!(out.state.velocity, MAX_FORCE);

        // Already moving close to the desired speed, the force is not capped.
        let moving = ThermometerState {
            velocity: 1.9,
            ..ThermometerState::at_rest(12.5)
        };
        let out = step(moving, 20.0);
        assert_relative_eq!(out.state.velocity, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn velocity_is_clamped() {
        let fast = ThermometerState {
            velocity: MAX_SPEED,
            ..ThermometerState::at_rest(-1000.0)
        };
        let out = step(fast, 1000.0);
        assert_relative_eq!(out.state.velocity, MAX_SPEED);
    }

    #[test]
    fn seek_starts_tick_source_once() {
        let mut controller = EasingController::new(-40.0);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.seek(20.0));
        assert!(controller.is_animating());
        assert!(!controller.seek(30.0));
        assert_eq!(controller.target(), 30.0);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let mut controller = EasingController::new(5.0);
        assert!(!controller.tick());
        assert_eq!(controller.value(), 5.0);
    }

    #[test]
    fn seek_to_current_value_stops_on_first_tick() {
        let mut controller = EasingController::new(10.0);
        controller.seek(10.0);
        assert!(!controller.tick());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.value(), 10.0);
    }

    #[test]
    fn settles_near_target_and_goes_idle() {
        let mut controller = EasingController::new(-40.0);
        controller.seek(20.0);
        let mut ticks = 0;
        while controller.is_animating() {
            controller.tick();
            ticks += 1;
            assert!(ticks <= 500, "did not settle");
        }
        assert!((controller.value() - 20.0).abs() < DEADBAND);
        assert!(controller.velocity().abs() < DEADBAND);
    }

    #[test]
    fn retarget_while_animating_keeps_running() {
        let mut controller = EasingController::new(0.0);
        controller.seek(40.0);
        for _ in 0..10 {
            controller.tick();
        }
        assert!(!controller.seek(-10.0));
        while controller.is_animating() {
            controller.tick();
        }
        assert!((controller.value() + 10.0).abs() < DEADBAND);
    }
}
