use crate::player::state::{PendingDirection, PlayerError, SessionEvent};
use crate::slide::Slide;

// One-shot auto-advance budget for the current slide. Holding it in an
// Option keeps the "at most one live timer" rule structural: arming
// replaces, cancelling takes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlideTimer {
    remaining_ms: f32,
}

// One run-through of a fixed slide sequence. Owned exclusively by the view
// that created it; all operations run on the caller's frame loop and the
// only asynchrony is the armed timer counted down through tick().
pub struct PlaybackSession {
    slides: Vec<Slide>,
    current: usize,
    paused: bool,
    pending: Option<PendingDirection>,
    timer: Option<SlideTimer>,
}

impl PlaybackSession {
    // Slide content is not validated here; the story builder owns that.
    pub fn create(slides: Vec<Slide>) -> Result<Self, PlayerError> {
        if slides.is_empty() {
            return Err(PlayerError::EmptySequence);
        }
        let mut session = Self {
            slides,
            current: 0,
            paused: false,
            pending: None,
            timer: None,
        };
        session.ensure_timer();
        Ok(session)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending(&self) -> Option<PendingDirection> {
        self.pending
    }

    pub fn timer_remaining_ms(&self) -> Option<f32> {
        self.timer.map(|t| t.remaining_ms)
    }

    fn at_end(&self) -> bool {
        self.current_slide().is_terminal || self.current + 1 == self.slides.len()
    }

    // Request forward navigation. On the last or terminal slide, with no
    // other request in flight, this means "close" instead.
    pub fn advance(&mut self) -> Option<SessionEvent> {
        if self.pending.is_none() && self.at_end() {
            self.timer = None;
            return Some(SessionEvent::Ended);
        }
        self.timer = None;
        self.pending = Some(PendingDirection::Advancing);
        None
    }

    // Request backward navigation. A tap on the first slide is a dead tap:
    // nothing changes, the armed timer keeps counting.
    pub fn retreat(&mut self) {
        if self.current == 0 {
            return;
        }
        self.timer = None;
        self.pending = Some(PendingDirection::Retreating);
    }

    // Suspends auto-advance and discards the remaining budget; resume()
    // re-arms the full duration rather than the leftover.
    pub fn pause(&mut self) {
        self.paused = true;
        self.timer = None;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.ensure_timer();
    }

    // Destroys this session and hands back a fresh one over the identical
    // slide sequence, index reset to 0.
    pub fn restart(self) -> (Self, SessionEvent) {
        let mut next = Self {
            slides: self.slides,
            current: 0,
            paused: false,
            pending: None,
            timer: None,
        };
        next.ensure_timer();
        (next, SessionEvent::Restarted)
    }

    pub fn close(self) -> SessionEvent {
        SessionEvent::Ended
    }

    // One scheduling tick of the frame loop: resolve the pending request,
    // re-arm if the premise holds, then count the armed timer down. Expiry
    // behaves exactly like a manual advance().
    pub fn tick(&mut self, dt_ms: f32) -> Option<SessionEvent> {
        if let Some(direction) = self.pending.take() {
            match direction {
                PendingDirection::Advancing => {
                    if self.current + 1 < self.slides.len() {
                        self.current += 1;
                    }
                }
                PendingDirection::Retreating => {
                    self.current = self.current.saturating_sub(1);
                }
            }
        }

        self.ensure_timer();

        if self.paused {
            return None;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.remaining_ms -= dt_ms;
            if timer.remaining_ms <= 0.0 {
                self.timer = None;
                return self.advance();
            }
        }
        None
    }

    // Arm a fresh full-duration timer whenever the current slide is
    // non-terminal, playback is running and no navigation is in flight.
    // Terminal slides never arm, so arrival there stops the clock for good.
    fn ensure_timer(&mut self) {
        if self.timer.is_some()
            || self.paused
            || self.pending.is_some()
            || self.current_slide().is_terminal
        {
            return;
        }
        self.timer = Some(SlideTimer {
            remaining_ms: self.current_slide().effective_duration_ms(),
        });
    }
}
