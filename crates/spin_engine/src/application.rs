//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError, FrameReport};
use crate::foundation::math::translation_of;
use crate::foundation::time::ClockReading;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with the engine's frame loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Build the scene here and hand it
    /// to the engine with [`Engine::set_scene`].
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Host logic for a frame
    ///
    /// Called every frame before the update pass, with the reading that the
    /// pass will use. Structural scene edits belong here.
    fn update(&mut self, _engine: &mut Engine, _now: ClockReading) -> Result<(), AppError> {
        Ok(())
    }

    /// Render the frame
    ///
    /// Called after the update pass. The scene is read-only from here until
    /// the next frame's update pass. The default logs every drawable's world
    /// position at trace level.
    fn render(&mut self, engine: &mut Engine, frame: &FrameReport) -> Result<(), AppError> {
        for (id, world) in engine.scene().collect_drawables() {
            log::trace!(
                "frame {} drawable {:?} at {:?}",
                frame.index,
                id,
                translation_of(&world)
            );
        }
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called when the frame loop has stopped.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene construction error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
