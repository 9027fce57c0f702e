use std::time::{Duration, Instant};

/// Wall-clock stopwatch that only counts time spent playing.
///
/// Time between `pause` and `resume` is never added, so level scaling and
/// spawn acceleration see playing time only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayClock {
    banked: Duration,
    resumed_at: Option<Instant>,
}

impl PlayClock {
    pub fn started(now: Instant) -> Self {
        Self {
            banked: Duration::ZERO,
            resumed_at: Some(now),
        }
    }

    pub fn is_running(&self) -> bool {
        self.resumed_at.is_some()
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.banked += now.saturating_duration_since(resumed_at);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    /// Freeze the clock for good; `elapsed` keeps reporting the final value
    pub fn halt(&mut self, now: Instant) {
        self.pause(now);
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.resumed_at {
            Some(resumed_at) => self.banked + now.saturating_duration_since(resumed_at),
            None => self.banked,
        }
    }

    /// Wall-clock instant at which the clock reads `playing`, if it is running.
    /// Readings already in the past map to the resume instant.
    pub fn instant_at(&self, playing: Duration) -> Option<Instant> {
        self.resumed_at
            .map(|resumed_at| resumed_at + playing.saturating_sub(self.banked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn default_clock_is_stopped_at_zero() {
        let clock = PlayClock::default();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn elapsed_tracks_wall_time_while_running() {
        let t0 = Instant::now();
        let clock = PlayClock::started(t0);
        assert_eq!(clock.elapsed(t0 + ms(1500)), ms(1500));
    }

    #[test]
    fn paused_time_is_excluded() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);
        clock.pause(t0 + ms(1000));
        assert_eq!(clock.elapsed(t0 + ms(60_000)), ms(1000));

        clock.resume(t0 + ms(60_000));
        assert_eq!(clock.elapsed(t0 + ms(60_500)), ms(1500));
    }

    #[test]
    fn double_pause_and_double_resume_are_harmless() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);
        clock.pause(t0 + ms(100));
        clock.pause(t0 + ms(900));
        assert_eq!(clock.elapsed(t0 + ms(1000)), ms(100));

        clock.resume(t0 + ms(1000));
        clock.resume(t0 + ms(5000));
        assert_eq!(clock.elapsed(t0 + ms(5000)), ms(4100));
    }

    #[test]
    fn instant_at_maps_playing_time_to_wall_time() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);
        clock.pause(t0 + ms(1000));
        assert_eq!(clock.instant_at(ms(2000)), None);

        let t1 = t0 + ms(10_000);
        clock.resume(t1);
        assert_eq!(clock.instant_at(ms(2000)), Some(t1 + ms(1000)));
        assert_eq!(clock.instant_at(ms(500)), Some(t1));
    }

    #[test]
    fn halted_clock_keeps_final_reading() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);
        clock.halt(t0 + ms(2500));
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(t0 + ms(99_000)), ms(2500));
    }
}
