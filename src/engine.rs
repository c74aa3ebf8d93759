use crate::keys::KeySet;
use crate::layout::KeyboardLayout;
use crate::touch::{KeyPress, KeyTracker, TouchEvent};

/// What a frontend must do after an event: sound the struck keys, stop the
/// released ones (backends that can), and repaint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    pub strikes: Vec<KeyPress>,
    pub releases: Vec<KeyPress>,
    pub redraw: bool,
}

/// Platform-agnostic wrapper around the layout + key tracker pair.
/// UI frontends translate their input into `TouchEvent`s and feed it here.
pub struct Engine {
    layout: KeyboardLayout,
    tracker: KeyTracker,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_size(0.0, 0.0)
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            layout: KeyboardLayout::compute(width, height),
            tracker: KeyTracker::new(),
        }
    }

    /// Recomputes the layout for a new surface size. Press state carries
    /// over; the next touch event re-resolves it against the new geometry.
    pub fn resize(&mut self, width: f32, height: f32) -> Effects {
        self.layout = KeyboardLayout::compute(width, height);
        Effects {
            redraw: true,
            ..Effects::default()
        }
    }

    /// Every touch event redraws, even when nothing changed.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> Effects {
        let resolution = self.tracker.resolve(event, &self.layout);
        Effects {
            strikes: resolution.strikes,
            releases: resolution.releases,
            redraw: true,
        }
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn pressed_white(&self) -> KeySet {
        self.tracker.pressed_white()
    }

    pub fn pressed_black(&self) -> KeySet {
        self.tracker.pressed_black()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
