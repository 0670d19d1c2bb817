//! Scene graph storage and traversals
//!
//! Nodes live in a slot map arena and reference each other by [`NodeId`].
//! Every attachment is checked, so the structure is always a tree rooted at
//! a single node: a node has at most one parent and can never become its
//! own ancestor.

use slotmap::SlotMap;

use crate::assets::Drawable;
use crate::foundation::math::Mat4;
use crate::foundation::time::ClockReading;
use crate::scene::node::{Node, NodeId, NodeKind, TransformNode};
use crate::scene::SceneError;

/// Counters from one update pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Nodes reached from the root
    pub nodes_visited: usize,
    /// Update behaviors invoked
    pub behaviors_run: usize,
}

/// Read-only visitor for the render side of a frame
///
/// `world` is the product of every ancestor's local matrix and the node's own.
pub trait NodeVisitor {
    /// Called once per reachable node in pre-order
    fn visit(&mut self, id: NodeId, node: &Node, world: &Mat4);
}

impl<F> NodeVisitor for F
where
    F: FnMut(NodeId, &Node, &Mat4),
{
    fn visit(&mut self, id: NodeId, node: &Node, world: &Mat4) {
        self(id, node, world);
    }
}

/// Tree of groups, transforms, and geodes with a single root
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Graph whose root is an empty group
    pub fn new() -> Self {
        Self::with_root(Node::named("root", NodeKind::Group))
    }

    /// Graph rooted at `root`
    pub fn with_root(mut root: Node) -> Self {
        let mut nodes = SlotMap::with_key();
        root.parent = None;
        root.children.clear();
        let root = nodes.insert(root);
        Self { nodes, root }
    }

    /// Root node id
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes owned, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph owns at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Transform content of `id`, if it is a transform node
    pub fn transform(&self, id: NodeId) -> Option<&TransformNode> {
        self.node(id)?.as_transform()
    }

    /// Mutable transform content of `id`, if it is a transform node
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.node_mut(id)?.as_transform_mut()
    }

    /// Parent of `id`
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent()
    }

    /// Children of `id` in traversal order (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    /// Store a node without attaching it anywhere
    ///
    /// Detached nodes are not visited until attached with [`Self::add_child`].
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// Rejected if either id is unknown, `child` is the root, `child` already
    /// has a parent, or `child` is `parent` or one of its ancestors.
    /// Attaching never changes the child's matrix or behavior state.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let child_node = self.node(child).ok_or(SceneError::UnknownNode(child))?;
        if child == self.root {
            return Err(SceneError::RootAttachment);
        }
        if let Some(existing) = child_node.parent() {
            return Err(SceneError::AlreadyParented { child, parent: existing });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }

        log::debug!(
            "Attached {} to {}",
            self.display_name(child),
            self.display_name(parent)
        );
        Ok(())
    }

    /// Store `node` and attach it under `parent`
    pub fn insert_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.add_node(node);
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// New empty group under `parent`
    pub fn add_group(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.insert_child(parent, Node::new(NodeKind::Group))
    }

    /// New transform node under `parent`
    pub fn add_transform(&mut self, parent: NodeId, transform: TransformNode) -> Result<NodeId, SceneError> {
        self.insert_child(parent, Node::new(NodeKind::Transform(transform)))
    }

    /// New geode under `parent`
    pub fn add_geode(&mut self, parent: NodeId, drawable: Drawable) -> Result<NodeId, SceneError> {
        self.insert_child(parent, Node::new(NodeKind::Geode(drawable)))
    }

    /// Remove `id` and every node below it, returning how many were dropped
    ///
    /// Behaviors owned by removed transform nodes are dropped with them.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let parent = self.node(id).ok_or(SceneError::UnknownNode(id))?.parent();

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children.retain(|&c| c != id);
        }

        let doomed = self.descendants(id);
        for node_id in &doomed {
            self.nodes.remove(*node_id);
        }

        log::debug!("Removed subtree of {} nodes", doomed.len());
        Ok(doomed.len())
    }

    /// `id` and all its descendants in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else { continue };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Run one update pass at `now`
    ///
    /// Visits every node reachable from the root exactly once in pre-order.
    /// A node's behavior runs before any of its children are visited; groups
    /// and geodes are passed over without mutation.
    pub fn update(&mut self, now: ClockReading) -> UpdateStats {
        let mut stats = UpdateStats::default();
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else { continue };
            stats.nodes_visited += 1;
            if node.run_update(now) {
                stats.behaviors_run += 1;
            }
            stack.extend(node.children.iter().rev().copied());
        }

        log::trace!(
            "Update pass at {:.6}s: {} nodes, {} behaviors",
            now.as_secs_f64(),
            stats.nodes_visited,
            stats.behaviors_run
        );
        stats
    }

    /// Walk every reachable node in pre-order with its world matrix
    pub fn visit<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack = vec![(self.root, Mat4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            let world = parent_world * node.local_matrix();
            visitor.visit(id, node, &world);
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
    }

    /// Accumulated matrix from the root down to and including `id`
    ///
    /// `None` for unknown ids.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut world = self.node(id)?.local_matrix();
        let mut current = self.parent_of(id);
        while let Some(ancestor) = current {
            let node = self.node(ancestor)?;
            world = node.local_matrix() * world;
            current = node.parent();
        }
        Some(world)
    }

    /// Every reachable geode with its world matrix, in traversal order
    pub fn collect_drawables(&self) -> Vec<(NodeId, Mat4)> {
        let mut out = Vec::new();
        self.visit(&mut |id: NodeId, node: &Node, world: &Mat4| {
            if node.drawable().is_some() {
                out.push((id, *world));
            }
        });
        out
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    fn display_name(&self, id: NodeId) -> String {
        self.node(id)
            .map_or_else(|| format!("{id:?}"), |n| n.display_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Mesh;
    use crate::foundation::math::{rotation_degrees, translation, Vec3};
    use crate::scene::behavior::RotationBehavior;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn cube() -> Drawable {
        Drawable::colored(Mesh::cube(Vec3::zeros(), 1.0))
    }

    #[test]
    fn test_new_graph_has_group_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert!(matches!(graph.node(graph.root()).map(Node::kind), Some(NodeKind::Group)));
        assert!(graph.children(graph.root()).is_empty());
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add_group(root).unwrap();
        let geode = graph.add_geode(group, cube()).unwrap();

        assert_eq!(graph.children(root), &[group]);
        assert_eq!(graph.children(group), &[geode]);
        assert_eq!(graph.parent_of(geode), Some(group));
        assert_eq!(graph.parent_of(root), None);
    }

    #[test]
    fn test_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_group(root).unwrap();
        let b = graph.add_group(a).unwrap();

        let detached = graph.add_node(Node::new(NodeKind::Group));
        assert!(matches!(
            graph.add_child(detached, detached),
            Err(SceneError::CycleDetected { .. })
        ));
        assert!(matches!(graph.add_child(b, root), Err(SceneError::RootAttachment)));
        assert!(matches!(
            graph.add_child(b, a),
            Err(SceneError::AlreadyParented { .. })
        ));
    }

    #[test]
    fn test_rejects_ancestor_attachment() {
        let mut graph = SceneGraph::new();
        let top = graph.add_node(Node::new(NodeKind::Group));
        let below = graph.insert_child(top, Node::new(NodeKind::Group)).unwrap();
        assert!(matches!(
            graph.add_child(below, top),
            Err(SceneError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_unknown_ids() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let gone = graph.add_group(root).unwrap();
        graph.remove_subtree(gone).unwrap();

        assert!(matches!(graph.add_group(gone), Err(SceneError::UnknownNode(_))));
        assert!(matches!(graph.add_child(root, gone), Err(SceneError::UnknownNode(_))));
        assert!(graph.world_matrix(gone).is_none());
        assert!(graph.children(gone).is_empty());
    }

    #[test]
    fn test_update_visits_pre_order_once() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let t1 = graph
            .add_transform(root, TransformNode::identity().with_behavior(RotationBehavior::default()))
            .unwrap();
        graph.add_geode(t1, cube()).unwrap();
        let t2 = graph
            .add_transform(root, TransformNode::identity().with_behavior(RotationBehavior::default()))
            .unwrap();
        graph.add_geode(t2, cube()).unwrap();
        // detached nodes are not part of the pass
        graph.add_node(Node::new(NodeKind::Transform(
            TransformNode::identity().with_behavior(RotationBehavior::default()),
        )));

        let stats = graph.update(ClockReading::ZERO);
        assert_eq!(stats, UpdateStats { nodes_visited: 5, behaviors_run: 2 });

        let mut order = Vec::new();
        graph.visit(&mut |id: NodeId, _: &Node, _: &Mat4| order.push(id));
        assert_eq!(order, graph.descendants(root));
        assert_eq!(order.len(), 5);
        assert_eq!(order[1], t1);
        assert_eq!(order[3], t2);
    }

    #[test]
    fn test_world_matrices_accumulate() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let outer = graph
            .add_transform(root, TransformNode::new(translation(&Vec3::new(1.0, 0.0, 0.0))))
            .unwrap();
        let inner = graph
            .add_transform(outer, TransformNode::new(rotation_degrees(&Vec3::z(), 90.0)))
            .unwrap();
        let geode = graph.add_geode(inner, cube()).unwrap();

        let expected = translation(&Vec3::new(1.0, 0.0, 0.0)) * rotation_degrees(&Vec3::z(), 90.0);
        assert_relative_eq!(graph.world_matrix(geode).unwrap(), expected, epsilon = EPSILON);

        let drawables = graph.collect_drawables();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, geode);
        assert_relative_eq!(drawables[0].1, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let t = graph.add_transform(root, TransformNode::identity()).unwrap();
        graph.add_geode(t, cube()).unwrap();
        let keep = graph.add_group(root).unwrap();

        assert_eq!(graph.remove_subtree(t).unwrap(), 2);
        assert_eq!(graph.children(root), &[keep]);
        assert_eq!(graph.len(), 2);
        assert!(matches!(graph.remove_subtree(root), Err(SceneError::RootRemoval)));
    }

    #[test]
    fn test_transform_root() {
        let mut graph = SceneGraph::with_root(Node::named(
            "spinner",
            NodeKind::Transform(TransformNode::identity().with_behavior(RotationBehavior::default())),
        ));
        let root = graph.root();
        graph.add_geode(root, cube()).unwrap();

        graph.update(ClockReading::ZERO);
        let stats = graph.update(ClockReading::from_secs_f64(0.5));
        assert_eq!(stats.behaviors_run, 1);

        let expected = rotation_degrees(&Vec3::new(2.0, 1.0, 1.0), 30.0);
        assert_relative_eq!(*graph.transform(root).unwrap().matrix(), expected, epsilon = EPSILON);
    }
}
