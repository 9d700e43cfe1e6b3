#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod resolver;
pub mod selection;

pub use config::ResolverConfig;
pub use error::{MalformedReason, ResolveError};
pub use manifest::{discover_category_assets, load_manifest};
pub use models::{
  AssetDescriptor, Category, DescriptorRecord, Manifest, OrderDirective, ResolvedManifest,
};
pub use resolver::{ManifestResolution, resolve_category, resolve_manifest};
pub use selection::{AssetInclusion, AssetSelection};
