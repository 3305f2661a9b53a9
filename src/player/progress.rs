use crate::player::state::PendingDirection;

// Render state of one indicator segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Empty,
    Filled,
    // Current slide, animating empty to full; carries the fill fraction.
    Active(f32),
}

// Pure function of session state. Segments before the current slide are
// full; the current segment is drawn full while an advance is pending so
// the bar never flickers back to empty before the index catches up, and
// empty while a retreat is pending (the original UI did the same).
pub fn segments(
    len: usize,
    current: usize,
    pending: Option<PendingDirection>,
    fill: f32,
) -> Vec<Segment> {
    (0..len)
        .map(|index| {
            if index < current {
                Segment::Filled
            } else if index == current {
                match pending {
                    Some(PendingDirection::Advancing) => Segment::Filled,
                    Some(PendingDirection::Retreating) => Segment::Empty,
                    None => Segment::Active(fill.clamp(0.0, 1.0)),
                }
            } else {
                Segment::Empty
            }
        })
        .collect()
}

// The only state the indicator keeps: the fill animation for the current
// segment. Freezes (without resetting) while paused; a fresh animation
// instance starts from empty whenever the slide changes or a hold is
// released, matching the engine's discard-elapsed pause semantics.
pub struct ProgressFill {
    slide: usize,
    elapsed_ms: f32,
    paused: bool,
}

impl ProgressFill {
    pub fn new() -> Self {
        Self {
            slide: 0,
            elapsed_ms: 0.0,
            paused: false,
        }
    }

    pub fn observe(&mut self, current: usize, paused: bool) {
        if current != self.slide {
            self.slide = current;
            self.elapsed_ms = 0.0;
        }
        if self.paused && !paused {
            self.elapsed_ms = 0.0;
        }
        self.paused = paused;
    }

    pub fn advance(&mut self, dt_ms: f32) {
        if !self.paused {
            self.elapsed_ms += dt_ms;
        }
    }

    pub fn fraction(&self, duration_ms: f32) -> f32 {
        if duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / duration_ms).min(1.0)
    }
}
