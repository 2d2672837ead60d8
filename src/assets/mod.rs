//! Asset boundary: logical asset keys resolved to handles the renderer understands.

mod catalog;

pub use catalog::{AssetCatalog, AssetEntry, AssetHandle, AssetResolver};
