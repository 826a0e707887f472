use std::time::{Duration, Instant};

/// Times one pipeline stage and logs it on drop, with an optional summary
/// line attached through [`StageTimer::finish_with`].
pub struct StageTimer {
    stage: &'static str,
    start: Instant,
    summary: Option<String>,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        log::debug!("{}: started", stage);
        Self {
            stage,
            start: Instant::now(),
            summary: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with(mut self, summary: String) {
        self.summary = Some(summary);
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        match &self.summary {
            Some(summary) => log::info!("{} took {:?}: {}", self.stage, self.elapsed(), summary),
            None => log::info!("{} took {:?}", self.stage, self.elapsed()),
        }
    }
}
