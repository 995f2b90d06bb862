//! # PackView Core
//!
//! Core types and error handling shared by the PackView crates:
//! box and container descriptors, display colors, and the layout error
//! taxonomy.

pub mod error;
pub mod types;

pub use error::{Error, LayoutError, Result};
pub use types::{
    Axis, BoxSpec, Color, ColorParseError, ContainerSpec, PackingPoint, SceneConfig,
    DEFAULT_CONTAINER_SEGMENTS,
};
