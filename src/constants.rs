pub const WINDOW_WIDTH: i32 = 400;            // Portrait phone canvas, like the hosted viewer
pub const WINDOW_HEIGHT: i32 = 800;
pub const FPS: u32 = 60;                      // Frames per second

pub const DEFAULT_SLIDE_DURATION_MS: f32 = 3000.0; // Auto-advance budget per slide
pub const RETREAT_ZONE_FRACTION: f32 = 0.30;       // Left share of the window that taps backwards
pub const TAP_HOLD_THRESHOLD_MS: f32 = 250.0;      // Shorter presses count as taps, longer as holds

pub const MIN_PHOTOS: usize = 6;              // Photo count accepted by the story builder
pub const MAX_PHOTOS: usize = 10;
pub const MAX_PHOTO_EDGE: u32 = 1600;         // Imported photos are downscaled to fit this edge

pub const DEFAULT_TTL_DAYS: i64 = 90;         // Invitation retention before cleanup
pub const ID_SUFFIX_LEN: usize = 4;           // Random letters appended on id collision
