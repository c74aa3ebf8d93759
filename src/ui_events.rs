use crate::engine::{Effects, Engine};
use crate::touch::TouchEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Touch(TouchEvent),
    Resized { width: f32, height: f32 },
}

#[derive(Debug)]
pub struct UiOutput {
    pub effects: Effects,
    /// True when the UI should emit a haptic "tick" for this event.
    pub haptic: bool,
}

/// Platform-agnostic UI event processor.
///
/// Frontends (desktop, Android, future) can translate their raw input into
/// `UiEvent`s, and optionally record/replay those streams for regression
/// testing.
pub struct UiSession {
    engine: Engine,
}

impl UiSession {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn handle(&mut self, event: UiEvent) -> UiOutput {
        match event {
            UiEvent::Resized { width, height } => UiOutput {
                effects: self.engine.resize(width, height),
                haptic: false,
            },
            UiEvent::Touch(te) => {
                let effects = self.engine.handle_touch(&te);
                UiOutput {
                    haptic: !effects.strikes.is_empty(),
                    effects,
                }
            }
        }
    }
}

impl Default for UiSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiEventLog {
    pub events: Vec<UiEvent>,
}

impl UiEventLog {
    pub fn record(&mut self, event: UiEvent) {
        self.events.push(event);
    }

    pub fn replay(&self, session: &mut UiSession) -> Vec<Effects> {
        self.events
            .iter()
            .map(|e| session.handle(e.clone()).effects)
            .collect()
    }
}
