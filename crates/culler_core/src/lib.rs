//! Culler core: media model, eligibility filter and pure cache/selection state.
mod filter;
mod item;
mod selection;
mod window;

pub use filter::{has_dated_filename, MediaFilter, DEFAULT_VENDOR};
pub use item::{MediaItem, MediaMetadata, PhotoMetadata};
pub use selection::{unseen, CameraInfo, ReviewCard, Selection};
pub use window::{CacheWindow, DEFAULT_CACHE_TTL};
