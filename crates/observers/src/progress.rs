use trafflow_core::Observer;

use crate::traits::HasStep;

/// Logs solver progress at `info` level every `every_percent` percent.
///
/// Never acts on the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    label: String,
    total_steps: usize,
    every_percent: usize,
    next_percent: usize,
    reports: usize,
}

impl Progress {
    /// Creates a progress logger for a run of `total_steps` steps.
    ///
    /// `every_percent` is clamped to `1..=100`.
    #[must_use]
    pub fn new(label: impl Into<String>, total_steps: usize, every_percent: usize) -> Self {
        Self {
            label: label.into(),
            total_steps,
            every_percent: every_percent.clamp(1, 100),
            next_percent: 0,
            reports: 0,
        }
    }

    /// Returns how many progress lines have been logged.
    #[must_use]
    pub fn reports(&self) -> usize {
        self.reports
    }

    fn record(&mut self, step: usize) {
        if self.total_steps == 0 || self.next_percent > 100 {
            return;
        }

        let percent = (step.min(self.total_steps) * 100) / self.total_steps;
        if percent < self.next_percent {
            return;
        }

        tracing::info!(
            run = %self.label,
            step,
            total = self.total_steps,
            percent,
            "progress"
        );
        self.reports += 1;
        self.next_percent = (percent / self.every_percent + 1) * self.every_percent;
    }
}

impl<E: HasStep, A> Observer<E, A> for Progress {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event.step());
        None
    }
}

/// Allows `&mut Progress` to be passed to solvers that take an observer by
/// value.
impl<E: HasStep, A> Observer<E, A> for &mut Progress {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
