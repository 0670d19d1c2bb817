//! # Core Engine Module
//!
//! Shared abstractions used across the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the frame driver, assets, and scenes

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    AssetConfig,
    SceneConfig,
    ScenePreset,
    BodyConfig,
    GeometryConfig,
    AppearanceConfig,
    RotationConfig,
    Config,
    ConfigError,
};
