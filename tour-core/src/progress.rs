//! Progress reporting for long-running builds and searches.

use std::sync::Arc;

/// Receives `(done, total)` updates.
///
/// Libraries never print; callers decide how to render progress.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Throttles calls to a [`ProgressCallback`].
pub(crate) struct ProgressReporter<'a> {
    callback: Option<&'a ProgressCallback>,
    total: u64,
    every: u64,
}

impl<'a> ProgressReporter<'a> {
    /// Report at most roughly a hundred times over `total` steps.
    pub(crate) fn new(callback: Option<&'a ProgressCallback>, total: u64) -> Self {
        let every = total.checked_div(100).unwrap_or(0).max(1);
        Self {
            callback,
            total,
            every,
        }
    }

    pub(crate) fn tick(&self, done: u64) {
        if let Some(callback) = self.callback
            && (done.checked_rem(self.every) == Some(0) || done == self.total)
        {
            callback(done, self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use rstest::rstest;

    #[rstest]
    fn reports_are_throttled_and_include_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |done, total| {
            sink.lock().expect("lock").push((done, total));
        });
        let reporter = ProgressReporter::new(Some(&callback), 250);
        for done in 1..=250 {
            reporter.tick(done);
        }
        let reports = seen.lock().expect("lock");
        assert_eq!(reports.len(), 125);
        assert_eq!(reports.last(), Some(&(250, 250)));
    }

    #[rstest]
    fn missing_callback_is_a_no_op() {
        let reporter = ProgressReporter::new(None, 3);
        reporter.tick(3);
    }
}
