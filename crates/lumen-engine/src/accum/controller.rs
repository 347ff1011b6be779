/// Why the accumulated history was invalidated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResetReason {
    /// Session start; device memory holds no valid history yet.
    Initial,
    CameraChanged,
    CameraReinitialized,
    SceneChanged,
    ResolutionChanged,
    /// The frame index would overflow its 32-bit counter.
    CounterOverflow,
}

/// Controller state.
///
/// `Reset` is transient: the next [`tick`](AccumulationController::tick) clears
/// the buffer and moves back to `Accumulating` with frame index 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AccumPhase {
    Accumulating,
    Reset,
}

/// Outcome of one frame tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameTick {
    /// Index handed to the kernel for this frame.
    pub frame_index: u32,
    /// The accumulation buffer must be zeroed before this frame's dispatch.
    pub clear: bool,
    /// Reason for the clear, when `clear` is set.
    pub reason: Option<ResetReason>,
}

impl FrameTick {
    /// Samples per pixel held by the buffer once this frame has been added.
    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.frame_index as u64 + 1
    }
}

/// Owns the frame counter and the reset protocol for the accumulation buffer.
///
/// After a tick returning `frame_index = n`, every pixel of the buffer holds the
/// sum of exactly `n + 1` samples taken since the last clear.
#[derive(Debug)]
pub struct AccumulationController {
    frame_index: u32,
    pending: Option<ResetReason>,
    frames_dispatched: u64,
}

impl AccumulationController {
    /// A fresh controller has a reset pending: the device buffer is undefined
    /// until the first clear.
    pub fn new() -> Self {
        Self {
            frame_index: 0,
            pending: Some(ResetReason::Initial),
            frames_dispatched: 0,
        }
    }

    pub fn phase(&self) -> AccumPhase {
        if self.pending.is_some() {
            AccumPhase::Reset
        } else {
            AccumPhase::Accumulating
        }
    }

    pub fn reset_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frame index of the most recent tick.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Samples per pixel after the most recent tick.
    pub fn sample_count(&self) -> u64 {
        if self.frames_dispatched == 0 {
            0
        } else {
            self.frame_index as u64 + 1
        }
    }

    /// Total ticks since the controller was created, across resets.
    pub fn frames_dispatched(&self) -> u64 {
        self.frames_dispatched
    }

    /// Marks the history stale. The first reason recorded before a tick wins.
    pub fn request_reset(&mut self, reason: ResetReason) {
        if self.pending.is_none() {
            log::debug!("accumulation reset requested: {reason:?}");
            self.pending = Some(reason);
        }
    }

    /// Advances one frame. Call exactly once per dispatched frame, before the
    /// frame's seeds are derived.
    pub fn tick(&mut self) -> FrameTick {
        self.frames_dispatched = self.frames_dispatched.wrapping_add(1);

        let reason = match self.pending.take() {
            Some(reason) => Some(reason),
            None => match self.frame_index.checked_add(1) {
                Some(next) => {
                    self.frame_index = next;
                    None
                }
                None => Some(ResetReason::CounterOverflow),
            },
        };

        if reason.is_some() {
            self.frame_index = 0;
        }

        FrameTick {
            frame_index: self.frame_index,
            clear: reason.is_some(),
            reason,
        }
    }
}

impl Default for AccumulationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_clears() {
        let mut acc = AccumulationController::new();
        assert_eq!(acc.phase(), AccumPhase::Reset);
        assert_eq!(acc.sample_count(), 0);

        let tick = acc.tick();
        assert!(tick.clear);
        assert_eq!(tick.reason, Some(ResetReason::Initial));
        assert_eq!(tick.frame_index, 0);
        assert_eq!(tick.sample_count(), 1);
        assert_eq!(acc.phase(), AccumPhase::Accumulating);
    }

    #[test]
    fn steady_frames_increment_by_one_without_clearing() {
        let mut acc = AccumulationController::new();
        acc.tick();
        for expected in 1..=100u32 {
            let tick = acc.tick();
            assert!(!tick.clear);
            assert_eq!(tick.frame_index, expected);
            assert_eq!(acc.sample_count(), expected as u64 + 1);
        }
    }

    #[test]
    fn reset_returns_index_to_zero() {
        let mut acc = AccumulationController::new();
        for _ in 0..10 {
            acc.tick();
        }
        acc.request_reset(ResetReason::CameraChanged);
        assert_eq!(acc.phase(), AccumPhase::Reset);

        let tick = acc.tick();
        assert!(tick.clear);
        assert_eq!(tick.frame_index, 0);
        assert_eq!(acc.tick().frame_index, 1);
    }

    #[test]
    fn multiple_requests_collapse_into_one_clear() {
        let mut acc = AccumulationController::new();
        acc.tick();
        acc.request_reset(ResetReason::CameraChanged);
        acc.request_reset(ResetReason::SceneChanged);

        let tick = acc.tick();
        assert_eq!(tick.reason, Some(ResetReason::CameraChanged));
        assert!(!acc.tick().clear);
    }

    #[test]
    fn counter_overflow_forces_a_clear() {
        let mut acc = AccumulationController::new();
        acc.tick();
        acc.frame_index = u32::MAX;

        let tick = acc.tick();
        assert!(tick.clear);
        assert_eq!(tick.reason, Some(ResetReason::CounterOverflow));
        assert_eq!(tick.frame_index, 0);
    }
}
