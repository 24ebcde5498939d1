//! Per-aggregate repositories.
//!
//! Every mutation runs inside one transaction. An early return drops the
//! uncommitted `DatabaseTransaction`, which rolls it back, so a failed write
//! never leaves partial rows behind.

mod artist;
mod show;
mod venue;

pub use artist::ArtistRepository;
pub use show::{ShowListing, ShowRepository, ShowSearch};
pub use venue::VenueRepository;
