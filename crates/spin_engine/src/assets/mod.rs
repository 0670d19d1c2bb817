//! Static scene content: meshes, images, and appearances
//!
//! Everything here is populated once while a scene is constructed and then
//! treated as opaque by the scene graph.

pub mod mesh;
pub mod image_loader;
pub mod appearance;

pub use mesh::{Mesh, Color, CUBE_PALETTE, CUBE_QUADS};
pub use image_loader::ImageData;
pub use appearance::{Appearance, Drawable};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
