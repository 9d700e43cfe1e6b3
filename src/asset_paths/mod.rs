//! Helpers for normalising and filtering asset paths.
//!
//! Descriptor paths and discovered files pass through the same normalisation so that
//! `./app.js`, `/app.js` and `app.js` all name a single node when resolving load order.

mod filters;
mod normalise;

pub use filters::{IgnoreRules, should_ignore_discovered_path};
pub use normalise::normalise_asset_path;
