/// Normalization layer
///
/// Pure functions mapping provider-specific payload shapes to canonical
/// domain records. No I/O beyond what is passed in.
pub mod annotation;
pub mod listing;
pub mod media;
pub mod review;

pub use annotation::{summarize_engine, Annotation};
pub use listing::{normalize_listing, NormalizedListing};
pub use media::{normalize_comments, normalize_post, NormalizedComment, NormalizedPost};
pub use review::{normalize_review, NormalizedReview};
