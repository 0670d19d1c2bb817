//! Spinning cube demo
//!
//! Builds one of the preset scenes (or a scene loaded from a TOML/RON file)
//! and drives it with the engine's frame loop, logging where every cube is
//! once a second.
//!
//! ```text
//! cube_demo [single | group | textured | path/to/config.toml]
//! ```

use spin_engine::config::{Config, ConfigError};
use spin_engine::foundation::logging;
use spin_engine::foundation::math::translation_of;
use spin_engine::prelude::*;
use thiserror::Error;

/// Frames between position reports
const REPORT_INTERVAL: u64 = 60;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

struct CubeDemo {
    config: ApplicationConfig,
    bodies: Vec<NodeId>,
}

impl CubeDemo {
    const fn new(config: ApplicationConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
        }
    }

    fn report(&self, engine: &Engine, frame: &FrameReport) {
        let scene = engine.scene();
        for &body in &self.bodies {
            let name = scene.node(body).and_then(Node::name).unwrap_or("body");
            let degrees = scene
                .transform(body)
                .and_then(TransformNode::behavior_as::<RotationBehavior>)
                .map_or(0.0, RotationBehavior::accumulated_degrees);

            for &child in scene.children(body) {
                let (Some(world), Some(drawable)) = (
                    scene.world_matrix(child),
                    scene.node(child).and_then(Node::drawable),
                ) else {
                    continue;
                };
                let centroid = world.transform_point(&drawable.mesh.centroid());
                log::info!(
                    "frame {:>5} | {:<12} | {:>8.1} deg | centroid ({:.2}, {:.2}, {:.2}) | origin {:?}",
                    frame.index,
                    name,
                    degrees,
                    centroid.x,
                    centroid.y,
                    centroid.z,
                    translation_of(&world).as_slice()
                );
            }
        }
    }
}

impl Application for CubeDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building scene with {} bodies", self.config.scene.bodies.len());
        let built = SceneBuilder::new(&self.config.scene)
            .with_assets(self.config.assets.clone())
            .at(engine.now())
            .build()?;
        self.bodies = built.bodies;
        engine.set_scene(built.graph);
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine, frame: &FrameReport) -> Result<(), AppError> {
        if frame.index == 1 || frame.index % REPORT_INTERVAL == 0 {
            self.report(engine, frame);
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Ran {} frames over {:.2}s",
            engine.timer().frame_count(),
            engine.timer().total_time()
        );
    }
}

fn load_config(arg: Option<&str>) -> Result<ApplicationConfig, ConfigError> {
    let config = match arg {
        None => ApplicationConfig::from_preset(ScenePreset::SingleCube),
        Some(path) if path.ends_with(".toml") || path.ends_with(".ron") => {
            ApplicationConfig::load_from_file(path)?
        }
        Some(name) => ApplicationConfig::from_preset(name.parse()?),
    };
    config.validate()?;
    Ok(config)
}

/// Load the configuration, logging any failure
///
/// The configured log level is only known once loading succeeds, so errors
/// are reported through a logger at the default level.
fn load_config_or_report(arg: Option<&str>) -> Result<ApplicationConfig, ConfigError> {
    load_config(arg).inspect_err(|e| {
        logging::init_with_level(logging::LevelFilter::Info);
        log::error!("Failed to load configuration from {:?}: {e}", arg.unwrap_or("default"));
    })
}

fn main() -> Result<(), DemoError> {
    let arg = std::env::args().nth(1);
    let config = load_config_or_report(arg.as_deref())?;

    logging::init_with_level(config.engine.level_filter());
    log::info!("Starting spinning cube demo");

    let engine_config = config.engine.clone();
    let mut app = CubeDemo::new(config);

    Engine::run(engine_config, &mut app).inspect_err(|e| log::error!("Demo failed: {e}"))?;

    log::info!("Demo finished successfully");
    Ok(())
}
