//! Frame-driven tick timer.
//!
//! The host advances the clock once per rendered frame. A tick requested at
//! an open gate starts a countdown of `tick_length` frames; when it runs out
//! entities reach the tick boundary. A separate freeze countdown, started on
//! level-up, keeps the gate shut after the boundary until it expires.

use crate::state::Tick;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    tick_length: u32,
    tick_timer: u32,
    freeze_timer: u32,
    new_tick: bool,
    tick: Tick,
}

impl Clock {
    pub fn new(tick_length: u32) -> Self {
        Self {
            tick_length: tick_length.max(1),
            tick_timer: 0,
            freeze_timer: 0,
            new_tick: false,
            tick: Tick::ZERO,
        }
    }

    pub fn tick_length(&self) -> u32 {
        self.tick_length
    }

    /// Simulation steps started since creation.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Gate for the next tick: no tick in progress and no freeze running.
    pub fn can_tick(&self) -> bool {
        self.tick_timer == 0 && self.freeze_timer == 0
    }

    /// True for the frame on which a tick was requested.
    pub fn is_new_tick(&self) -> bool {
        self.new_tick
    }

    /// Entities complete their committed transition on these frames.
    pub fn at_boundary(&self) -> bool {
        self.can_tick() || self.new_tick
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0
    }

    /// Starts the next tick. Refused while the gate is shut.
    pub fn request_tick(&mut self) -> bool {
        if !self.can_tick() {
            return false;
        }
        self.new_tick = true;
        self.tick_timer = self.tick_length;
        self.tick = self.tick.next();
        true
    }

    /// One frame. Runs the tick countdown first; the freeze only drains once
    /// the current tick has finished.
    pub fn update(&mut self) {
        if self.tick_timer > 0 {
            self.tick_timer -= 1;
            self.new_tick = false;
        } else if self.freeze_timer > 0 {
            self.freeze_timer -= 1;
        }
    }

    pub fn freeze(&mut self, frames: u32) {
        self.freeze_timer = frames;
    }

    /// Interpolation fraction of the running tick, for presentation only.
    pub fn sub_tick_percent(&self) -> f64 {
        1.0 - f64::from(self.tick_timer) / f64::from(self.tick_length)
    }

    /// Back to an idle gate, keeping the tick length.
    pub fn reset(&mut self) {
        *self = Self::new(self.tick_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_runs_for_tick_length_frames() {
        let mut clock = Clock::new(3);
        assert!(clock.can_tick());
        assert!(clock.request_tick());
        assert!(clock.is_new_tick());
        assert!(clock.at_boundary());
        assert!(!clock.request_tick());
        assert_eq!(clock.sub_tick_percent(), 0.0);

        clock.update();
        assert!(!clock.is_new_tick());
        assert!(!clock.at_boundary());
        clock.update();
        clock.update();
        assert!(clock.can_tick());
        assert_eq!(clock.sub_tick_percent(), 1.0);
        assert_eq!(clock.tick(), Tick(1));
    }

    #[test]
    fn freeze_blocks_the_gate() {
        let mut clock = Clock::new(2);
        clock.request_tick();
        clock.freeze(3);
        clock.update();
        clock.update();
        assert!(!clock.can_tick());
        assert!(clock.is_frozen());
        for _ in 0..3 {
            assert!(!clock.request_tick());
            clock.update();
        }
        assert!(clock.can_tick());
        assert!(clock.request_tick());
    }

    #[test]
    fn zero_length_is_clamped() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.tick_length(), 1);
        clock.request_tick();
        clock.update();
        assert!(clock.can_tick());
    }
}
