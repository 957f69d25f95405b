use std::time::{Duration, Instant};

/// Pausable stopwatch.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from zero, running.
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(start) = self.running_since.take() {
            self.accumulated += start.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(start) => self.accumulated + start.elapsed(),
            None => self.accumulated,
        }
    }

    /// Stop, returning the time measured since the last restart.
    pub fn take(&mut self) -> Duration {
        let elapsed = self.elapsed();
        self.accumulated = Duration::ZERO;
        self.running_since = None;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn paused_timer_does_not_advance() {
        let mut timer = Timer::new();
        timer.restart();
        sleep(Duration::from_millis(5));
        timer.pause();
        let frozen = timer.elapsed();
        sleep(Duration::from_millis(5));
        assert_eq!(timer.elapsed(), frozen);
        assert!(frozen >= Duration::from_millis(5));
    }

    #[test]
    fn take_resets() {
        let mut timer = Timer::new();
        timer.restart();
        sleep(Duration::from_millis(2));
        assert!(timer.take() >= Duration::from_millis(2));
        sleep(Duration::from_millis(2));
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }
}
