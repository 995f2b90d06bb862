use super::{BoxSpec, Color, ContainerSpec};
use serde::{Deserialize, Serialize};

/// Default wireframe subdivisions per container edge
pub const DEFAULT_CONTAINER_SEGMENTS: u32 = 4;

/// What to visualize: the container and the packed boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_segments")]
    pub container_segments: u32,
    /// `None` draws no container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerSpec>,
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
}

fn default_segments() -> u32 {
    DEFAULT_CONTAINER_SEGMENTS
}

impl SceneConfig {
    pub fn empty() -> Self {
        Self {
            container: None,
            container_segments: DEFAULT_CONTAINER_SEGMENTS,
            boxes: Vec::new(),
        }
    }

    /// The demo packing: six boxes in a 4×4×4 container
    pub fn demo() -> Self {
        let green = Color::from_hex(0x2faf49);
        let orange = Color::from_hex(0xfab666);
        let blue = Color::from_hex(0x509ed8);
        let yellow = Color::from_hex(0xf1c232);

        Self {
            container: Some(ContainerSpec::new(4.0, 4.0, 4.0)),
            container_segments: DEFAULT_CONTAINER_SEGMENTS,
            boxes: vec![
                BoxSpec::new("Box ABC", 1.0, 1.0, 2.0).with_color(green),
                BoxSpec::new("Box DEF", 1.0, 4.0, 1.0)
                    .at(1.0, 0.0, 0.0)
                    .with_color(orange),
                BoxSpec::new("Box GHI", 3.0, 1.0, 1.0)
                    .at(0.0, 1.0, 0.0)
                    .with_color(blue),
                BoxSpec::new("Box JKL", 2.0, 3.0, 3.0)
                    .at(1.0, 1.0, 0.0)
                    .with_color(yellow),
                BoxSpec::new("Box MNO", 1.0, 1.0, 4.0)
                    .at(1.0, 3.0, 0.0)
                    .with_color(blue),
                BoxSpec::new("Box PQR", 2.0, 2.0, 1.0)
                    .at(2.0, 0.0, 3.0)
                    .with_color(green),
            ],
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::demo()
    }
}
