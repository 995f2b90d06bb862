//! Core data types shared across PackView crates.

mod color;
mod scene;
mod spec;

pub use color::{Color, ColorParseError};
pub use scene::{SceneConfig, DEFAULT_CONTAINER_SEGMENTS};
pub use spec::{Axis, BoxSpec, ContainerSpec, PackingPoint};
