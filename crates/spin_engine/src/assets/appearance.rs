//! Surface appearance and the drawable payload held by geode leaves

use std::path::Path;
use crate::assets::{ImageData, Mesh};

/// How a drawable's surface is colored
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Appearance {
    /// Interpolated per-vertex colors
    #[default]
    VertexColors,

    /// Texture mapped through the mesh's texture coordinates
    ///
    /// `texture` is `None` when the image could not be loaded; the drawable
    /// is then rendered untextured.
    Textured {
        /// Decoded image, if loading succeeded
        texture: Option<ImageData>,
    },
}

impl Appearance {
    /// Textured appearance from an image file
    ///
    /// Never fails: a missing or unreadable file is logged and produces an
    /// appearance with no texture bound.
    pub fn textured_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let texture = match ImageData::from_file(path) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Texture {:?} unavailable, drawing untextured: {}", path, e);
                None
            }
        };
        Self::Textured { texture }
    }

    /// Texture currently bound, if any
    pub fn texture(&self) -> Option<&ImageData> {
        match self {
            Self::Textured { texture } => texture.as_ref(),
            Self::VertexColors => None,
        }
    }

    /// Whether texturing should be enabled for this surface
    pub fn is_textured(&self) -> bool {
        self.texture().is_some()
    }
}

/// Renderable leaf content: a mesh plus its appearance
///
/// Built once during scene construction; the update traversal never reads
/// or modifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Geometry
    pub mesh: Mesh,
    /// Surface appearance
    pub appearance: Appearance,
}

impl Drawable {
    /// Vertex-colored drawable
    pub fn colored(mesh: Mesh) -> Self {
        Self {
            mesh,
            appearance: Appearance::VertexColors,
        }
    }

    /// Drawable with an explicit appearance
    pub fn new(mesh: Mesh, appearance: Appearance) -> Self {
        Self { mesh, appearance }
    }
}
