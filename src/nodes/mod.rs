//! Built-in processor nodes.
//!
//! - [`StaticSource`] - Upstream source with a fixed channel layout
//! - [`Merger`] - Selects between two sources and merges their metadata

mod merger;
mod source;

pub use merger::{Merger, Slot};
pub use source::StaticSource;
