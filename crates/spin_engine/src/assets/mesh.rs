//! Static mesh data for drawable leaves
//!
//! Meshes are populated once at scene construction and never touched by the
//! update traversal. The render collaborator reads them together with the
//! world matrix of the geode that holds them.

use crate::assets::AssetError;
use crate::foundation::math::{Vec3, Point3};

/// RGBA color in linear `[0, 1]` components
pub type Color = [f32; 4];

/// Palette cycled over cube vertices
pub const CUBE_PALETTE: [Color; 6] = [
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 1.0, 1.0], // magenta
    [0.0, 1.0, 1.0, 1.0], // cyan
];

/// Quad faces of the 8-vertex cube: front, back, bottom, top, left, right
pub const CUBE_QUADS: [u32; 24] = [
    0, 1, 2, 3,
    4, 5, 6, 7,
    0, 1, 5, 4,
    2, 3, 7, 6,
    0, 3, 7, 4,
    1, 2, 6, 5,
];

/// Per-vertex texture coordinates for the 8-vertex cube
const CUBE_TEX_COORDS: [[f32; 2]; 8] = [
    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
];

/// Indexed quad mesh with per-vertex attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions in the mesh's local frame
    pub positions: Vec<Point3>,

    /// Quad index list, four indices per face
    pub quads: Vec<u32>,

    /// One color per vertex
    pub colors: Vec<Color>,

    /// Optional texture coordinates, one per vertex
    pub tex_coords: Option<Vec<[f32; 2]>>,
}

impl Mesh {
    /// Axis-aligned cube spanning `center ± half_extent`
    ///
    /// Vertices 0..4 lie on the `-z` face and 4..8 on the `+z` face, both
    /// wound counter-clockwise starting from the `(-x, -y)` corner.
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        let h = half_extent;
        let corners = [
            (-h, -h, -h), (h, -h, -h), (h, h, -h), (-h, h, -h),
            (-h, -h, h), (h, -h, h), (h, h, h), (-h, h, h),
        ];

        let positions = corners
            .iter()
            .map(|&(x, y, z)| Point3::new(center.x + x, center.y + y, center.z + z))
            .collect::<Vec<_>>();

        let colors = (0..positions.len())
            .map(|i| CUBE_PALETTE[i % CUBE_PALETTE.len()])
            .collect();

        Self {
            positions,
            quads: CUBE_QUADS.to_vec(),
            colors,
            tex_coords: None,
        }
    }

    /// Attach the cube texture mapping (each `z` face gets the full image)
    #[must_use]
    pub fn with_cube_tex_coords(mut self) -> Self {
        self.tex_coords = Some(CUBE_TEX_COORDS.to_vec());
        self
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of quad faces
    pub fn face_count(&self) -> usize {
        self.quads.len() / 4
    }

    /// Center of the axis-aligned bounds
    pub fn centroid(&self) -> Point3 {
        if self.positions.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .positions
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.positions.len() as f32)
    }

    /// Check index ranges and attribute counts
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.quads.len() % 4 != 0 {
            return Err(AssetError::InvalidData(format!(
                "quad index count {} is not a multiple of 4",
                self.quads.len()
            )));
        }

        let count = self.positions.len();
        if let Some(bad) = self.quads.iter().find(|&&i| i as usize >= count) {
            return Err(AssetError::InvalidData(format!(
                "quad index {bad} out of range for {count} vertices"
            )));
        }

        if self.colors.len() != count {
            return Err(AssetError::InvalidData(format!(
                "{} colors for {count} vertices",
                self.colors.len()
            )));
        }

        if let Some(tex_coords) = &self.tex_coords {
            if tex_coords.len() != count {
                return Err(AssetError::InvalidData(format!(
                    "{} texture coordinates for {count} vertices",
                    tex_coords.len()
                )));
            }
        }

        Ok(())
    }
}
