//! Timed phases of a single shot.
//!
//! The camera choreography around a shot used to be two independent
//! fire-and-forget delayed callbacks; firing again before they ran could
//! leave camera mode and collider state inconsistent. This sequencer makes
//! the phases explicit and rejects triggers while a shot is in flight.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    Idle,
    /// Launched; camera is following the cannonball.
    Firing,
    /// Camera has cut to the aim preset; waiting out the cannonball lifetime.
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    /// Cut the camera to the aim preset.
    AimCut,
    /// Shot is over: remove the cannonball and restore home state.
    Finished,
}

#[derive(Debug, Clone)]
pub struct ShotSequence {
    phase: SequencePhase,
    remaining: f32,
    cut_delay: f32,
    return_delay: f32,
}

impl ShotSequence {
    /// `cut_delay` is the time from launch until the camera cuts away from
    /// the cannonball; `lifetime` is the total time from launch until the
    /// cannonball is removed.
    pub fn new(cut_delay: f32, lifetime: f32) -> Self {
        Self {
            phase: SequencePhase::Idle,
            remaining: 0.0,
            cut_delay,
            return_delay: (lifetime - cut_delay).max(0.0),
        }
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SequencePhase::Idle
    }

    /// Starts the sequence. Returns false (and changes nothing) if a shot is
    /// already in flight.
    pub fn try_trigger(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = SequencePhase::Firing;
        self.remaining = self.cut_delay;
        true
    }

    /// Advances time. Crosses at most one phase boundary per call; leftover
    /// time carries into the next phase.
    pub fn tick(&mut self, dt: f32) -> Option<SequenceEvent> {
        if self.is_idle() {
            return None;
        }

        self.remaining -= dt;
        if self.remaining > 0.0 {
            return None;
        }

        match self.phase {
            SequencePhase::Firing => {
                self.phase = SequencePhase::Returning;
                self.remaining += self.return_delay;
                Some(SequenceEvent::AimCut)
            }
            SequencePhase::Returning => {
                self.phase = SequencePhase::Idle;
                self.remaining = 0.0;
                Some(SequenceEvent::Finished)
            }
            SequencePhase::Idle => None,
        }
    }
}
