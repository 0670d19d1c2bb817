//! Per-node update behaviors
//!
//! A behavior is attached to a transform node and invoked exactly once per
//! update pass, before the node's children are visited. It receives the
//! node's [`LocalTransform`] and the frame's clock reading, so it can only
//! ever run against a node that actually carries a matrix.

use std::any::Any;
use std::fmt;

use crate::foundation::math::{rotation_degrees, Mat4, Vec3};
use crate::foundation::time::{elapsed_seconds, ClockReading};

/// Default angular speed of [`RotationBehavior`], in degrees per second
pub const DEFAULT_DEGREES_PER_SECOND: f32 = 60.0;

/// Default rotation axis of [`RotationBehavior`] (spins about all three axes)
pub const DEFAULT_AXIS: [f32; 3] = [2.0, 1.0, 1.0];

/// Mutable local-to-parent matrix of a transform node
///
/// Only transform nodes own one. Handing out `&mut LocalTransform` is how
/// the scene graph grants a behavior permission to move a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    matrix: Mat4,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl LocalTransform {
    /// Wrap an affine matrix
    pub const fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Identity transform
    pub fn identity() -> Self {
        Self::new(Mat4::identity())
    }

    /// Current matrix
    pub const fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Replace the matrix
    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    /// Compose `increment` in the node's own frame: `matrix = matrix * increment`
    ///
    /// The increment acts on points before the existing transform, so a
    /// rotation increment spins the object about its own axis and leaves the
    /// translation column alone.
    pub fn apply_local(&mut self, increment: &Mat4) {
        self.matrix *= increment;
    }
}

/// Object invoked once per update pass on the transform node that owns it
pub trait UpdateBehavior {
    /// Mutate `target` for the frame sampled at `now`
    fn on_update(&mut self, target: &mut LocalTransform, now: ClockReading);

    /// Short name for logs
    fn name(&self) -> &'static str {
        "behavior"
    }

    /// Downcasting hook for inspecting concrete behavior state
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn UpdateBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpdateBehavior({})", self.name())
    }
}

/// Spins a node at a fixed angular speed, independent of frame rate
///
/// Each instance keeps its own `last_tick`, so any number of animated nodes
/// can share one traversal without affecting each other's timing.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationBehavior {
    axis: Vec3,
    degrees_per_second: f32,
    last_tick: Option<ClockReading>,
    accumulated_degrees: f32,
}

impl Default for RotationBehavior {
    fn default() -> Self {
        Self::new(Vec3::from(DEFAULT_AXIS), DEFAULT_DEGREES_PER_SECOND)
    }
}

impl RotationBehavior {
    /// Rotation about `axis` at `degrees_per_second`
    ///
    /// The axis is normalized when the rotation is built; its length has no
    /// effect on speed. The first update only records the reading, so the
    /// time between construction and the first frame is never applied.
    pub fn new(axis: Vec3, degrees_per_second: f32) -> Self {
        Self {
            axis,
            degrees_per_second,
            last_tick: None,
            accumulated_degrees: 0.0,
        }
    }

    /// Same as [`RotationBehavior::new`], but timing starts at `reading`
    ///
    /// The first update then rotates by everything elapsed since `reading`.
    pub fn started_at(reading: ClockReading, axis: Vec3, degrees_per_second: f32) -> Self {
        Self {
            last_tick: Some(reading),
            ..Self::new(axis, degrees_per_second)
        }
    }

    /// Rotation axis as configured (not normalized)
    pub const fn axis(&self) -> &Vec3 {
        &self.axis
    }

    /// Angular speed in degrees per second
    pub const fn degrees_per_second(&self) -> f32 {
        self.degrees_per_second
    }

    /// Reading of the most recent update, if any
    pub const fn last_tick(&self) -> Option<ClockReading> {
        self.last_tick
    }

    /// Total angle applied so far, in degrees
    ///
    /// Counts elapsed time times speed even when the axis is degenerate and
    /// the applied increment is the identity.
    pub const fn accumulated_degrees(&self) -> f32 {
        self.accumulated_degrees
    }
}

impl UpdateBehavior for RotationBehavior {
    fn on_update(&mut self, target: &mut LocalTransform, now: ClockReading) {
        let Some(last) = self.last_tick.replace(now) else {
            log::trace!("Rotation primed at {:.6}s", now.as_secs_f64());
            return;
        };

        let dt = elapsed_seconds(last, now);
        let angle = dt * self.degrees_per_second;
        if !angle.is_finite() {
            log::debug!("Skipping non-finite rotation of {angle} deg over {dt:.6}s");
            return;
        }
        if angle == 0.0 {
            return;
        }

        target.apply_local(&rotation_degrees(&self.axis, angle));
        self.accumulated_degrees += angle;

        log::trace!(
            "Rotated {:.4} deg over {:.6}s (total {:.4} deg)",
            angle,
            dt,
            self.accumulated_degrees
        );
    }

    fn name(&self) -> &'static str {
        "rotation"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
