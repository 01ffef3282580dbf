//! Viewport classification and the page size policy derived from it.

use serde::{Deserialize, Serialize};

/// Widths strictly below this many logical pixels count as a small viewport.
pub const SMALL_VIEWPORT_BREAKPOINT: u32 = 768;

/// Coarse size class reported by a viewport observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Small,
    #[default]
    Normal,
}

impl ViewportClass {
    /// Classifies a viewport width in logical pixels.
    pub fn from_width(width: u32) -> Self {
        if width < SMALL_VIEWPORT_BREAKPOINT {
            ViewportClass::Small
        } else {
            ViewportClass::Normal
        }
    }
}

/// Maps a viewport class to the number of records fetched per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizePolicy {
    /// Page size for small viewports.
    pub small: usize,
    /// Page size for every other viewport.
    pub normal: usize,
}

impl Default for PageSizePolicy {
    fn default() -> Self {
        Self {
            small: 5,
            normal: 10,
        }
    }
}

impl PageSizePolicy {
    /// Returns the page size for a viewport class.
    pub fn page_size(&self, class: ViewportClass) -> usize {
        match class {
            ViewportClass::Small => self.small,
            ViewportClass::Normal => self.normal,
        }
    }
}
