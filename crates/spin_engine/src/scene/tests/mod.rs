//! Scene-level tests that drive whole graphs through several frames

mod rotation_scenarios;
