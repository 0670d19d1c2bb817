//! # Spin Engine
//!
//! A small retained-mode scene graph with per-frame update behaviors.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed tree of group, transform, and geometry nodes
//! - **Update Behaviors**: Per-transform callbacks driven by one clock reading per frame
//! - **Frame Driver**: Update-then-render loop with pacing and frame limits
//! - **Configuration**: TOML and RON scene descriptions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spin_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let config = SceneConfig::single_cube();
//!         let built = SceneBuilder::new(&config).build()?;
//!         engine.set_scene(built.graph);
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_max_frames(120);
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod scene;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError, FrameReport};
pub use crate::core::config::EngineConfig;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineConfig, EngineError, FrameReport,
        foundation::{
            math::{Vec3, Mat4, Point3},
            time::{Clock, ClockReading, ManualClock, MonotonicClock},
        },
        assets::{Appearance, Drawable, Mesh},
        scene::{
            BuiltScene, LocalTransform, Node, NodeId, NodeKind, RotationBehavior,
            SceneBuilder, SceneError, SceneGraph, TransformNode, UpdateBehavior,
        },
        config::Config,
        core::config::{ApplicationConfig, SceneConfig, ScenePreset},
    };
}
