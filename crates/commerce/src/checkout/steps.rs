//! Checkout step navigation.
//!
//! A deliberately simple state separate from payment submission: a current
//! index over an ordered set of sections, moved by explicit navigation
//! requests. Nothing gates a transition here; callers that want validation
//! gating layer it on top.

/// Indicator styling for one step position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// Before the active step.
    Completed,
    /// The step currently shown.
    Active,
    /// After the active step.
    Upcoming,
}

/// Position within an ordered set of checkout sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTracker {
    current: usize,
    count: usize,
}

impl StepTracker {
    /// Create a tracker over `count` sections, starting at the first.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    /// Zero-based index of the active step.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Number of sections.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Jump to a step; out-of-range requests clamp to the last step.
    pub fn go_to(&mut self, step: usize) {
        self.current = step.min(self.count - 1);
    }

    /// Advance one step, saturating at the last.
    pub fn next(&mut self) {
        self.go_to(self.current.saturating_add(1));
    }

    /// Go back one step, saturating at the first.
    pub fn back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Indicator phase for the step at `index`.
    #[must_use]
    pub const fn phase(&self, index: usize) -> StepPhase {
        if index < self.current {
            StepPhase::Completed
        } else if index == self.current {
            StepPhase::Active
        } else {
            StepPhase::Upcoming
        }
    }
}
