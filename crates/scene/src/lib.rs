pub mod arc;
pub mod camera;
pub mod compose;
pub mod config;
pub mod director;
pub mod markers;

pub use compose::*;
pub use config::SceneConfig;
pub use director::*;
