//! Viewport classification capability.
//!
//! The feed loader asks an injected classifier for the current viewport class
//! instead of reading any global state. Whatever observes the real window
//! (resize events, terminal size, a test) updates the classifier.

use listsync_types::ViewportClass;
use std::sync::atomic::{AtomicU32, Ordering};

/// Reports the current viewport class.
pub trait ViewportClassifier: Send + Sync {
    fn classify(&self) -> ViewportClass;
}

impl<F> ViewportClassifier for F
where
    F: Fn() -> ViewportClass + Send + Sync,
{
    fn classify(&self) -> ViewportClass {
        self()
    }
}

/// A classifier that never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedViewport(pub ViewportClass);

impl ViewportClassifier for FixedViewport {
    fn classify(&self) -> ViewportClass {
        self.0
    }
}

/// A viewport width shared between an observer and the loaders reading it.
#[derive(Debug)]
pub struct SharedViewport {
    width: AtomicU32,
}

impl SharedViewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
        }
    }

    /// Records a new width. Loaders pick it up on their next viewport sync.
    pub fn set_width(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }

    pub fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}

impl ViewportClassifier for SharedViewport {
    fn classify(&self) -> ViewportClass {
        ViewportClass::from_width(self.width())
    }
}
