//! Ordering manifest loading and discovery of assets the manifest leaves unlisted.

mod discovery;
mod loading;

pub use discovery::{collect_assets_recursively, discover_category_assets};
pub use loading::load_manifest;
