//! Frame driver
//!
//! Each frame samples the clock once, runs exactly one update pass over the
//! scene graph with that reading, and then hands the frame to the
//! application's render step. Frames never overlap and everything runs on
//! the calling thread.

use std::time::{Duration, Instant};

use crate::{
    application::Application,
    core::config::EngineConfig,
    foundation::time::{Clock, ClockReading, FrameTimer, MonotonicClock},
    scene::{SceneGraph, UpdateStats},
};
use thiserror::Error;

/// What happened in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// 1-based frame number
    pub index: u64,
    /// Clock reading shared by every behavior in this frame
    pub now: ClockReading,
    /// Update pass counters
    pub stats: UpdateStats,
}

/// Main engine struct
///
/// Owns the scene graph and the clock, and runs the frame loop.
pub struct Engine {
    scene: SceneGraph,
    clock: Box<dyn Clock>,
    timer: FrameTimer,
    config: EngineConfig,
    started_at: ClockReading,
    running: bool,
}

impl Engine {
    /// Create an engine driven by a monotonic wall clock
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_clock(config, Box::new(MonotonicClock::new()))
    }

    /// Create an engine driven by `clock`
    pub fn with_clock(config: EngineConfig, clock: Box<dyn Clock>) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(EngineError::ConfigError)?;

        let started_at = clock.now();
        log::info!("Initializing engine...");

        Ok(Self {
            scene: SceneGraph::new(),
            clock,
            timer: FrameTimer::new(),
            config,
            started_at,
            running: true,
        })
    }

    /// Run the frame loop until a limit is reached or [`Engine::quit`] is called
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;
        engine.run_app(app)
    }

    /// Run the frame loop on an existing engine
    pub fn run_app<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");

        let frame_budget = self
            .config
            .target_fps
            .map(|fps| Duration::from_secs_f32(1.0 / fps));

        while self.running {
            let frame_start = Instant::now();
            self.step(app)?;

            if let Some(budget) = frame_budget {
                if let Some(remaining) = budget.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        app.cleanup(self);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        Ok(())
    }

    /// Run one complete frame: host update, scene update pass, render
    pub fn step<T: Application>(&mut self, app: &mut T) -> Result<FrameReport, EngineError> {
        let now = self.clock.now();

        app.update(self, now)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

        let frame = self.update_at(now);

        app.render(self, &frame)
            .map_err(|e| EngineError::ApplicationError(format!("App render: {e}")))?;

        if self.limits_reached(now) {
            self.running = false;
        }
        Ok(frame)
    }

    /// Sample the clock and run one update pass
    pub fn update_scene(&mut self) -> FrameReport {
        let now = self.clock.now();
        self.update_at(now)
    }

    fn update_at(&mut self, now: ClockReading) -> FrameReport {
        self.timer.tick(now);
        let stats = self.scene.update(now);
        FrameReport {
            index: self.timer.frame_count(),
            now,
            stats,
        }
    }

    fn limits_reached(&self, now: ClockReading) -> bool {
        let frames_done = self
            .config
            .max_frames
            .is_some_and(|max| self.timer.frame_count() >= max);
        let time_done = self
            .config
            .max_seconds
            .is_some_and(|max| now.seconds_since(self.started_at) >= max);
        frames_done || time_done
    }

    /// Request engine shutdown after the current frame
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the frame loop will continue
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the scene graph, returning the previous one
    pub fn set_scene(&mut self, scene: SceneGraph) -> SceneGraph {
        std::mem::replace(&mut self.scene, scene)
    }

    /// Current scene graph
    pub const fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable scene graph, for structural edits between frames
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Current clock reading
    pub fn now(&self) -> ClockReading {
        self.clock.now()
    }

    /// Frame timing statistics
    pub const fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::foundation::time::ManualClock;
    use crate::scene::{NodeKind, Node, RotationBehavior, TransformNode};
    use std::rc::Rc;

    struct Spinner {
        clock: Rc<ManualClock>,
        renders: Vec<FrameReport>,
        cleaned_up: bool,
    }

    impl Application for Spinner {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let root = Node::named(
                "spinner",
                NodeKind::Transform(TransformNode::identity().with_behavior(RotationBehavior::default())),
            );
            engine.set_scene(SceneGraph::with_root(root));
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, _now: ClockReading) -> Result<(), AppError> {
            self.clock.advance(0.25);
            Ok(())
        }

        fn render(&mut self, _engine: &mut Engine, frame: &FrameReport) -> Result<(), AppError> {
            self.renders.push(*frame);
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    fn engine(config: EngineConfig, clock: &Rc<ManualClock>) -> Engine {
        Engine::with_clock(config.with_target_fps(None), Box::new(Rc::clone(clock))).unwrap()
    }

    #[test]
    fn test_stops_after_max_frames() {
        let clock = Rc::new(ManualClock::new());
        let mut engine = engine(EngineConfig::new().with_max_frames(3), &clock);
        let mut app = Spinner { clock: Rc::clone(&clock), renders: Vec::new(), cleaned_up: false };

        engine.run_app(&mut app).unwrap();

        assert_eq!(app.renders.len(), 3);
        assert!(app.cleaned_up);
        assert!(!engine.is_running());
        assert_eq!(engine.timer().frame_count(), 3);
        assert!(app.renders.iter().all(|f| f.stats.behaviors_run == 1));
        assert_eq!(app.renders[2].index, 3);
    }

    #[test]
    fn test_stops_after_max_seconds() {
        let clock = Rc::new(ManualClock::new());
        let mut engine = engine(EngineConfig::new().with_max_seconds(1.0), &clock);
        let mut app = Spinner { clock: Rc::clone(&clock), renders: Vec::new(), cleaned_up: false };

        engine.run_app(&mut app).unwrap();

        // readings 0.0, 0.25, 0.5, 0.75, 1.0; the host advances after sampling
        assert_eq!(app.renders.len(), 5);
        assert_eq!(app.renders[4].now, ClockReading::from_secs_f64(1.0));
    }

    #[test]
    fn test_frame_reading_is_sampled_before_host_update() {
        let clock = Rc::new(ManualClock::new());
        let mut engine = engine(EngineConfig::new(), &clock);
        let mut app = Spinner { clock: Rc::clone(&clock), renders: Vec::new(), cleaned_up: false };
        app.initialize(&mut engine).unwrap();

        let first = engine.step(&mut app).unwrap();
        let second = engine.step(&mut app).unwrap();

        assert_eq!(first.now, ClockReading::ZERO);
        assert_eq!(second.now, ClockReading::from_secs_f64(0.25));
    }

    #[test]
    fn test_update_scene_uses_engine_clock() {
        let clock = Rc::new(ManualClock::new());
        let mut engine = engine(EngineConfig::new(), &clock);
        engine.set_scene(SceneGraph::with_root(Node::new(NodeKind::Transform(
            TransformNode::identity().with_behavior(RotationBehavior::default()),
        ))));

        engine.update_scene();
        clock.advance(0.5);
        let frame = engine.update_scene();

        let root = engine.scene().root();
        let behavior = engine
            .scene()
            .transform(root)
            .and_then(TransformNode::behavior_as::<RotationBehavior>)
            .unwrap();
        assert_eq!(frame.index, 2);
        assert!((behavior.accumulated_degrees() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Engine::new(EngineConfig::new().with_log_level("shouting"));
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }
}
