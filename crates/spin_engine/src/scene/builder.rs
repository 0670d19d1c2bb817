//! Scene construction from a [`SceneConfig`]
//!
//! One procedure covers every variant: geometry, appearance, and grouping are
//! all read from the description, while the update core stays the same.

use crate::assets::{Appearance, Drawable, Mesh};
use crate::core::config::{AppearanceConfig, AssetConfig, BodyConfig, GeometryConfig, SceneConfig};
use crate::foundation::math::{translation, Vec3};
use crate::foundation::time::ClockReading;
use crate::scene::behavior::RotationBehavior;
use crate::scene::node::{Node, NodeId, NodeKind, TransformNode};
use crate::scene::scene_graph::SceneGraph;
use crate::scene::SceneError;

/// Output of [`SceneBuilder::build`]
#[derive(Debug)]
pub struct BuiltScene {
    /// The constructed graph
    pub graph: SceneGraph,
    /// Transform node of each body, in description order
    pub bodies: Vec<NodeId>,
}

/// Builds a scene graph from a description
#[derive(Debug, Clone)]
pub struct SceneBuilder<'a> {
    scene: &'a SceneConfig,
    assets: AssetConfig,
    construction_time: ClockReading,
}

impl<'a> SceneBuilder<'a> {
    /// Builder for `scene` with default asset settings
    pub fn new(scene: &'a SceneConfig) -> Self {
        Self {
            scene,
            assets: AssetConfig::default(),
            construction_time: ClockReading::ZERO,
        }
    }

    /// Resolve texture paths with `assets`
    #[must_use]
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Clock reading used by rotations configured to start at construction
    #[must_use]
    pub fn at(mut self, now: ClockReading) -> Self {
        self.construction_time = now;
        self
    }

    /// Construct the graph
    pub fn build(&self) -> Result<BuiltScene, SceneError> {
        self.scene.validate().map_err(SceneError::InvalidDescription)?;

        let mut bodies = Vec::with_capacity(self.scene.bodies.len());

        let graph = if self.scene.grouped {
            let mut graph = SceneGraph::new();
            let root = graph.root();
            for body in &self.scene.bodies {
                let transform = graph.insert_child(root, self.transform_node(body))?;
                graph.add_geode(transform, self.drawable(body)?)?;
                bodies.push(transform);
            }
            graph
        } else {
            let body = self
                .scene
                .bodies
                .first()
                .ok_or_else(|| SceneError::InvalidDescription("no bodies".to_string()))?;
            let mut graph = SceneGraph::with_root(self.transform_node(body));
            let root = graph.root();
            graph.add_geode(root, self.drawable(body)?)?;
            bodies.push(root);
            graph
        };

        log::info!(
            "Built scene: {} bodies, {} nodes, grouped = {}",
            bodies.len(),
            graph.len(),
            self.scene.grouped
        );

        Ok(BuiltScene { graph, bodies })
    }

    fn transform_node(&self, body: &BodyConfig) -> Node {
        let mut transform = TransformNode::new(translation(&Vec3::from(body.translation)));

        if let Some(rotation) = &body.rotation {
            let axis = Vec3::from(rotation.axis);
            let behavior = if rotation.start_at_construction {
                RotationBehavior::started_at(self.construction_time, axis, rotation.degrees_per_second)
            } else {
                RotationBehavior::new(axis, rotation.degrees_per_second)
            };
            transform = transform.with_behavior(behavior);
        }

        let kind = NodeKind::Transform(transform);
        match &body.name {
            Some(name) => Node::named(name.clone(), kind),
            None => Node::new(kind),
        }
    }

    fn drawable(&self, body: &BodyConfig) -> Result<Drawable, SceneError> {
        let GeometryConfig::Cube { center, half_extent } = body.geometry;
        let mesh = Mesh::cube(Vec3::from(center), half_extent);

        let drawable = match &body.appearance {
            AppearanceConfig::VertexColors => Drawable::colored(mesh),
            AppearanceConfig::Texture { path } => Drawable::new(
                mesh.with_cube_tex_coords(),
                Appearance::textured_from_file(self.assets.resolve(path)),
            ),
        };

        drawable
            .mesh
            .validate()
            .map_err(|e| SceneError::InvalidDescription(e.to_string()))?;
        Ok(drawable)
    }
}
