//! Loading indicator arithmetic.

/// Percentage counter behind the loading view.
///
/// Starts at 0 and climbs by a fixed step, clamped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingProgress {
    step: u8,
    percent: u8,
}

impl LoadingProgress {
    /// Creates a counter at 0% that climbs by `step` per tick.
    #[must_use]
    pub const fn new(step: u8) -> Self {
        Self { step, percent: 0 }
    }

    /// Applies one tick and returns the new percentage.
    pub fn advance(&mut self) -> u8 {
        self.percent = self.percent.saturating_add(self.step).min(100);
        self.percent
    }

    /// Current percentage.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }

    /// Whether the counter reached 100%.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.percent >= 100
    }

    /// Ten-cell bar for the current percentage.
    #[must_use]
    pub fn bar(&self) -> String {
        let filled = usize::from(self.percent / 10);
        format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_completes_after_fifty_ticks() {
        let mut progress = LoadingProgress::new(2);
        for _ in 0..49 {
            progress.advance();
        }
        assert_eq!(progress.percent(), 98);
        assert!(!progress.is_complete());
        assert_eq!(progress.advance(), 100);
        assert!(progress.is_complete());
    }

    #[test]
    fn clamps_at_one_hundred() {
        let mut progress = LoadingProgress::new(30);
        progress.advance();
        progress.advance();
        progress.advance();
        assert_eq!(progress.advance(), 100);
        assert_eq!(progress.advance(), 100);
    }

    #[test]
    fn large_step_does_not_overflow() {
        let mut progress = LoadingProgress::new(200);
        assert_eq!(progress.advance(), 100);
    }

    #[test]
    fn bar_rendering() {
        let mut progress = LoadingProgress::new(40);
        assert_eq!(progress.bar(), "[..........]");
        progress.advance();
        assert_eq!(progress.bar(), "[####......]");
        progress.advance();
        progress.advance();
        assert_eq!(progress.bar(), "[##########]");
    }
}
