mod progress;
mod session;
mod state;

pub use progress::{segments, ProgressFill, Segment};
pub use session::PlaybackSession;
pub use state::{PendingDirection, PlayerError, SessionEvent};
