//! Scene graph nodes

use crate::assets::Drawable;
use crate::foundation::math::Mat4;
use crate::foundation::time::ClockReading;
use crate::scene::behavior::{LocalTransform, UpdateBehavior};

slotmap::new_key_type! {
    /// Stable handle to a node owned by a [`SceneGraph`](crate::scene::SceneGraph)
    pub struct NodeId;
}

/// Node carrying a local-to-parent matrix and, optionally, one update behavior
#[derive(Debug, Default)]
pub struct TransformNode {
    local: LocalTransform,
    behavior: Option<Box<dyn UpdateBehavior>>,
}

impl TransformNode {
    /// Static transform with the given matrix
    pub fn new(matrix: Mat4) -> Self {
        Self {
            local: LocalTransform::new(matrix),
            behavior: None,
        }
    }

    /// Identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Attach `behavior`, replacing any previous one
    #[must_use]
    pub fn with_behavior<B: UpdateBehavior + 'static>(mut self, behavior: B) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Attach a boxed behavior, returning the one it replaces
    pub fn set_behavior(&mut self, behavior: Box<dyn UpdateBehavior>) -> Option<Box<dyn UpdateBehavior>> {
        self.behavior.replace(behavior)
    }

    /// Detach the current behavior
    pub fn take_behavior(&mut self) -> Option<Box<dyn UpdateBehavior>> {
        self.behavior.take()
    }

    /// Attached behavior, if any
    pub fn behavior(&self) -> Option<&dyn UpdateBehavior> {
        self.behavior.as_deref()
    }

    /// Attached behavior downcast to `B`
    pub fn behavior_as<B: UpdateBehavior + 'static>(&self) -> Option<&B> {
        self.behavior()?.as_any().downcast_ref::<B>()
    }

    /// Local-to-parent matrix
    pub const fn matrix(&self) -> &Mat4 {
        self.local.matrix()
    }

    /// Local transform capability
    pub const fn local(&self) -> &LocalTransform {
        &self.local
    }

    /// Mutable local transform, for setup code outside the update pass
    pub fn local_mut(&mut self) -> &mut LocalTransform {
        &mut self.local
    }

    /// Run the attached behavior for this frame
    ///
    /// Returns whether a behavior was invoked.
    pub fn run_update(&mut self, now: ClockReading) -> bool {
        match self.behavior.as_mut() {
            Some(behavior) => {
                behavior.on_update(&mut self.local, now);
                true
            }
            None => false,
        }
    }
}

/// What a node is
#[derive(Debug)]
pub enum NodeKind {
    /// Pure aggregation of children, identity transform, no behavior
    Group,

    /// Matrix transform applied to all children
    Transform(TransformNode),

    /// Leaf holding renderable content
    Geode(Drawable),
}

impl NodeKind {
    /// Short label for logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Transform(_) => "transform",
            Self::Geode(_) => "geode",
        }
    }
}

/// A node of the scene graph
#[derive(Debug)]
pub struct Node {
    name: Option<String>,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Unattached node
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Unattached node with a debug name
    pub fn named(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(kind)
        }
    }

    /// Debug name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Node content
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node, `None` for the root and detached nodes
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in traversal order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Transform content, if this is a transform node
    pub const fn as_transform(&self) -> Option<&TransformNode> {
        match &self.kind {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable transform content, if this is a transform node
    pub fn as_transform_mut(&mut self) -> Option<&mut TransformNode> {
        match &mut self.kind {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The "has mutable transform" capability; `None` for groups and geodes
    pub fn transformable_mut(&mut self) -> Option<&mut LocalTransform> {
        self.as_transform_mut().map(TransformNode::local_mut)
    }

    /// Drawable content, if this is a geode
    pub const fn drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Geode(d) => Some(d),
            _ => None,
        }
    }

    /// Local matrix contributed to children (identity for groups and geodes)
    pub fn local_matrix(&self) -> Mat4 {
        self.as_transform().map_or_else(Mat4::identity, |t| *t.matrix())
    }

    /// Run this node's update behavior, if it has one
    pub(crate) fn run_update(&mut self, now: ClockReading) -> bool {
        self.as_transform_mut().is_some_and(|t| t.run_update(now))
    }

    /// Name for log messages
    pub(crate) fn display_name(&self) -> &str {
        self.name().unwrap_or_else(|| self.kind.label())
    }
}
