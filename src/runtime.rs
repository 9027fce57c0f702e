use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// motion frame is due
    Frame,
    /// the spawn deadline passed
    Spawn,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(GameEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(GameEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event reader stopped: {e}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that interleaves input, motion frames and spawn deadlines on one
/// thread. Each call to `step` yields exactly one event.
pub struct Runner<E: GameEventSource> {
    event_source: E,
    frame_interval: Duration,
    next_frame: Instant,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(event_source: E, frame_interval: Duration) -> Self {
        Self {
            event_source,
            frame_interval,
            next_frame: Instant::now() + frame_interval,
        }
    }

    /// Blocks until the next input event, the next frame tick, or
    /// `spawn_due`, whichever comes first. An overdue spawn is reported
    /// before an overdue frame.
    pub fn step(&mut self, spawn_due: Option<Instant>) -> GameEvent {
        loop {
            let now = Instant::now();
            if spawn_due.is_some_and(|due| due <= now) {
                return GameEvent::Spawn;
            }
            if self.next_frame <= now {
                self.next_frame = now + self.frame_interval;
                return GameEvent::Frame;
            }

            let deadline = spawn_due.map_or(self.next_frame, |due| due.min(self.next_frame));
            let timeout = deadline.saturating_duration_since(now);
            match self.event_source.recv_timeout(timeout) {
                Ok(ev) => return ev,
                Err(RecvTimeoutError::Timeout) => {}
                // no more input; keep the clocks going
                Err(RecvTimeoutError::Disconnected) => std::thread::sleep(timeout),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_frame_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(1));

        // With no events available, step should yield a frame
        match runner.step(None) {
            GameEvent::Frame => {}
            other => panic!("expected Frame on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(50));

        match runner.step(None) {
            GameEvent::Resize => {}
            other => panic!("expected Resize event, got {other:?}"),
        }
    }

    #[test]
    fn overdue_spawn_comes_first() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));

        match runner.step(Some(Instant::now())) {
            GameEvent::Spawn => {}
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[test]
    fn spawn_deadline_before_frame_wakes_runner() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_secs(10));

        let due = Instant::now() + Duration::from_millis(5);
        match runner.step(Some(due)) {
            GameEvent::Spawn => assert!(Instant::now() >= due),
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[test]
    fn disconnected_source_still_ticks() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(2));

        assert!(matches!(runner.step(None), GameEvent::Frame));
        assert!(matches!(runner.step(None), GameEvent::Frame));
    }
}
