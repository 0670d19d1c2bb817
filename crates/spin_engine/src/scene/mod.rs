//! Scene graph with per-node update behaviors
//!
//! ## Frame protocol
//!
//! ```text
//! frame driver: now = clock.now()
//!      ↓
//! SceneGraph::update(now)   pre-order; each transform's behavior runs
//!      ↓                    before its children are visited
//! render side: SceneGraph::visit / collect_drawables (read-only)
//! ```
//!
//! Groups only aggregate children, transforms carry a local matrix and at
//! most one [`UpdateBehavior`], and geodes hold opaque drawables.

pub mod behavior;
pub mod node;
mod scene_graph;
mod builder;

#[cfg(test)]
mod tests;

pub use behavior::{LocalTransform, RotationBehavior, UpdateBehavior};
pub use node::{Node, NodeId, NodeKind, TransformNode};
pub use scene_graph::{NodeVisitor, SceneGraph, UpdateStats};
pub use builder::{BuiltScene, SceneBuilder};

use thiserror::Error;

/// Scene graph structure errors
///
/// Only structural edits can fail; update passes never do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Id does not refer to a live node
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Attachment would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// Node already has a parent
    #[error("Node {child:?} is already attached to {parent:?}")]
    AlreadyParented {
        /// Node being attached
        child: NodeId,
        /// Its current parent
        parent: NodeId,
    },

    /// The root cannot be attached under another node
    #[error("The root node cannot become a child")]
    RootAttachment,

    /// The root cannot be removed
    #[error("The root node cannot be removed")]
    RootRemoval,

    /// Scene description rejected during construction
    #[error("Invalid scene description: {0}")]
    InvalidDescription(String),
}
