use serde::{Deserialize, Serialize};

/// User interactions forwarded to the slideshow controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControllerEvent {
    PointerEntered,
    PointerLeft,
    KeyPressed { key: ArrowKey },
    DotClicked { index: usize },
    NextClicked,
    PrevClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowKey {
    Left,
    Right,
}

/// Completed natural-size probe, tagged with the load id captured at issue time.
#[derive(Debug, Clone, Copy)]
pub struct Measured {
    pub load_id: u64,
    pub natural_width: u32,
    pub natural_height: u32,
}
