//! The slideshow state machine.
//!
//! Every public operation is a transition from the current state to a new one
//! plus a list of [`Effect`]s for the owning task to execute (timer set/clear,
//! async measurement issue). The state itself never touches a timer or the
//! filesystem, which keeps every transition synchronously testable.

use serde::Serialize;

use crate::events::{ArrowKey, ControllerEvent, Measured};

/// Coarse phase of the carousel, derived from the attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Empty,
    Playing,
    Paused,
}

/// Side effects requested by a transition; executed by the controller task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Clear any live autoplay timer, then start a fresh one unless the
    /// gallery is paused or empty.
    RestartAutoplay,
    /// Clear any live autoplay timer.
    StopAutoplay,
    /// Issue an async natural-size probe for the slide at `index`, tagged
    /// with `load_id`.
    Measure { index: usize, load_id: u64 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlideshowState {
    /// Fetched (or fallback) public image paths; empty until load settles.
    pub screenshots: Vec<String>,
    /// Always in `[0, len)` once the gallery is non-empty.
    pub current_index: usize,
    pub is_loading: bool,
    pub is_paused: bool,
    /// Displayed size of the current slide, capped at the configured maximum
    /// width with the image's aspect ratio preserved. Zero until the first
    /// measurement lands.
    pub container_width: f32,
    pub container_height: f32,
    #[serde(skip)]
    dimension_load_id: u64,
    #[serde(skip)]
    max_slide_width: f32,
}

impl SlideshowState {
    pub fn new(max_slide_width: f32) -> Self {
        Self {
            screenshots: Vec::new(),
            current_index: 0,
            is_loading: true,
            is_paused: false,
            container_width: 0.0,
            container_height: 0.0,
            dimension_load_id: 0,
            max_slide_width,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.screenshots.is_empty() {
            Phase::Empty
        } else if self.is_paused {
            Phase::Paused
        } else {
            Phase::Playing
        }
    }

    pub fn current_screenshot(&self) -> Option<&str> {
        self.screenshots.get(self.current_index).map(String::as_str)
    }

    /// The id a measurement result must carry to be accepted.
    pub fn dimension_load_id(&self) -> u64 {
        self.dimension_load_id
    }

    /// Settle the initial load with the fetched (or fallback) list.
    pub fn finish_loading(&mut self, screenshots: Vec<String>) -> Vec<Effect> {
        self.screenshots = screenshots;
        self.current_index = 0;
        self.is_loading = false;
        if self.screenshots.is_empty() {
            return Vec::new();
        }
        vec![self.issue_measure(), Effect::RestartAutoplay]
    }

    /// Normalize `index` into `[0, len)` with floored modulo (`-1` wraps to
    /// the last slide) and make it current. No-op on an empty gallery.
    pub fn go_to_slide(&mut self, index: i64) -> Vec<Effect> {
        let len = self.screenshots.len();
        if len == 0 {
            return Vec::new();
        }
        self.current_index = index.rem_euclid(len as i64) as usize;
        vec![self.issue_measure(), Effect::RestartAutoplay]
    }

    pub fn next_slide(&mut self) -> Vec<Effect> {
        self.go_to_slide(self.current_index as i64 + 1)
    }

    pub fn prev_slide(&mut self) -> Vec<Effect> {
        self.go_to_slide(self.current_index as i64 - 1)
    }

    pub fn handle_pointer_enter(&mut self) -> Vec<Effect> {
        self.is_paused = true;
        vec![Effect::StopAutoplay]
    }

    pub fn handle_pointer_leave(&mut self) -> Vec<Effect> {
        self.is_paused = false;
        vec![Effect::RestartAutoplay]
    }

    pub fn handle_event(&mut self, event: ControllerEvent) -> Vec<Effect> {
        match event {
            ControllerEvent::PointerEntered => self.handle_pointer_enter(),
            ControllerEvent::PointerLeft => self.handle_pointer_leave(),
            ControllerEvent::KeyPressed {
                key: ArrowKey::Left,
            } => self.prev_slide(),
            ControllerEvent::KeyPressed {
                key: ArrowKey::Right,
            } => self.next_slide(),
            ControllerEvent::DotClicked { index } => self.go_to_slide(index as i64),
            ControllerEvent::NextClicked => self.next_slide(),
            ControllerEvent::PrevClicked => self.prev_slide(),
        }
    }

    /// Accept a measurement result, unless a newer measurement superseded it.
    /// Returns whether the container dimensions changed.
    pub fn apply_measurement(&mut self, measured: Measured) -> bool {
        if measured.load_id != self.dimension_load_id || measured.natural_width == 0 {
            return false;
        }
        let width = (measured.natural_width as f32).min(self.max_slide_width);
        self.container_width = width;
        self.container_height =
            measured.natural_height as f32 / measured.natural_width as f32 * width;
        true
    }

    fn issue_measure(&mut self) -> Effect {
        self.dimension_load_id += 1;
        Effect::Measure {
            index: self.current_index,
            load_id: self.dimension_load_id,
        }
    }
}
