pub mod cloud;
pub mod constants;
pub mod error;
pub mod graph;
pub mod overlay;
pub mod seeded;
pub mod signal;
pub mod spring;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use cloud::*;
pub use constants::*;
pub use error::ParamError;
pub use graph::*;
pub use overlay::*;
pub use seeded::*;
pub use signal::*;
pub use spring::*;
