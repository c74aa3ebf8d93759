use crate::keys::{KeyColor, KeyId, KeySet, SampleId};
use crate::layout::{Key, KeyboardLayout};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

/// One input event: the phase plus every pointer still down after it.
///
/// Frontends translate their raw input into this batch form. A lifted pointer
/// is simply absent from the next batch; `Up`/`Cancel` mean the whole gesture
/// ended and the pointer list is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub pointers: Vec<PointerPos>,
}

impl TouchEvent {
    pub fn down(pointers: Vec<PointerPos>) -> Self {
        Self {
            phase: TouchPhase::Down,
            pointers,
        }
    }

    pub fn moved(pointers: Vec<PointerPos>) -> Self {
        Self {
            phase: TouchPhase::Move,
            pointers,
        }
    }

    pub fn up() -> Self {
        Self {
            phase: TouchPhase::Up,
            pointers: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPress {
    pub key: KeyId,
    pub color: KeyColor,
    pub sample: SampleId,
}

impl KeyPress {
    fn of(k: &Key) -> Self {
        Self {
            key: k.id,
            color: k.color,
            sample: k.sample,
        }
    }
}

/// Result of resolving one touch event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Keys to play a sample for, at most once per gesture (whites first).
    pub strikes: Vec<KeyPress>,
    /// Keys that left the pressed set this event.
    pub releases: Vec<KeyPress>,
}

/// Maps pointer batches onto key press state and one-shot strikes.
///
/// This is platform-agnostic: desktop mouse-drag and Android multitouch can
/// both feed it. The strike gate is a field here rather than anything global,
/// so independent sessions never interfere.
pub struct KeyTracker {
    pressed_white: KeySet,
    pressed_black: KeySet,

    /// Per-gesture gate: open until an event finds a key down, at which point
    /// every down key is struck and the gate closes until the gesture ends.
    sound_ready: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            pressed_white: KeySet::EMPTY,
            pressed_black: KeySet::EMPTY,
            sound_ready: true,
        }
    }

    pub fn pressed_white(&self) -> KeySet {
        self.pressed_white
    }

    pub fn pressed_black(&self) -> KeySet {
        self.pressed_black
    }

    pub fn resolve(&mut self, event: &TouchEvent, layout: &KeyboardLayout) -> Resolution {
        let down_phase = matches!(event.phase, TouchPhase::Down | TouchPhase::Move);

        // Pressed state is recomputed from the full pointer set each event,
        // OR-merged per key. A black key claims its pointer before any white
        // key gets to see it.
        let mut next_white = KeySet::EMPTY;
        let mut next_black = KeySet::EMPTY;
        if down_phase {
            for p in &event.pointers {
                if let Some(k) = layout.black_at(p.x, p.y) {
                    next_black.insert(k.id);
                } else if let Some(k) = layout.white_at(p.x, p.y) {
                    next_white.insert(k.id);
                }
            }
        }

        let mut strikes = Vec::new();
        if self.sound_ready && !(next_white.is_empty() && next_black.is_empty()) {
            for k in layout.whites() {
                if next_white.contains(k.id) {
                    strikes.push(KeyPress::of(k));
                }
            }
            for k in layout.blacks() {
                if next_black.contains(k.id) {
                    strikes.push(KeyPress::of(k));
                }
            }
            self.sound_ready = false;
        }

        let mut releases = Vec::new();
        for k in layout.whites() {
            if self.pressed_white.contains(k.id) && !next_white.contains(k.id) {
                releases.push(KeyPress::of(k));
            }
        }
        for k in layout.blacks() {
            if self.pressed_black.contains(k.id) && !next_black.contains(k.id) {
                releases.push(KeyPress::of(k));
            }
        }

        self.pressed_white = next_white;
        self.pressed_black = next_black;

        if matches!(event.phase, TouchPhase::Up | TouchPhase::Cancel) {
            self.sound_ready = true;
        }

        Resolution { strikes, releases }
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyColor;

    fn layout() -> KeyboardLayout {
        KeyboardLayout::compute(1400.0, 300.0)
    }

    fn p(x: f32, y: f32) -> PointerPos {
        PointerPos { x, y }
    }

    #[test]
    fn down_strikes_once_move_holds_up_clears() {
        let l = layout();
        let mut t = KeyTracker::new();

        let out = t.resolve(&TouchEvent::down(vec![p(50.0, 250.0)]), &l);
        assert_eq!(out.strikes.len(), 1);
        assert_eq!(out.strikes[0].key, KeyId(1));
        assert_eq!(out.strikes[0].color, KeyColor::White);
        assert_eq!(out.strikes[0].sample, SampleId::C2);
        assert!(t.pressed_white().contains(KeyId(1)));

        // Holding still must not re-strike.
        for _ in 0..3 {
            let out = t.resolve(&TouchEvent::moved(vec![p(50.0, 250.0)]), &l);
            assert_eq!(out.strikes, Vec::new());
            assert!(t.pressed_white().contains(KeyId(1)));
        }

        let out = t.resolve(&TouchEvent::up(), &l);
        assert_eq!(out.strikes, Vec::new());
        assert_eq!(out.releases.len(), 1);
        assert_eq!(out.releases[0].key, KeyId(1));
        assert!(t.pressed_white().is_empty());

        // The gate reopened: the next gesture strikes again.
        let out = t.resolve(&TouchEvent::down(vec![p(50.0, 250.0)]), &l);
        assert_eq!(out.strikes.len(), 1);
    }

    #[test]
    fn two_pointers_in_one_batch_strike_both() {
        let l = layout();
        let mut t = KeyTracker::new();

        let out = t.resolve(
            &TouchEvent::down(vec![p(50.0, 250.0), p(250.0, 250.0)]),
            &l,
        );
        let struck: Vec<KeyId> = out.strikes.iter().map(|s| s.key).collect();
        assert_eq!(struck, vec![KeyId(1), KeyId(3)]);
        assert_eq!(t.pressed_white().len(), 2);
    }

    #[test]
    fn second_finger_joining_late_does_not_restrike() {
        let l = layout();
        let mut t = KeyTracker::new();

        let out = t.resolve(&TouchEvent::down(vec![p(50.0, 250.0)]), &l);
        assert_eq!(out.strikes.len(), 1);

        // Second finger lands while the gate is closed: pressed, but silent.
        let out = t.resolve(
            &TouchEvent::down(vec![p(50.0, 250.0), p(250.0, 250.0)]),
            &l,
        );
        assert_eq!(out.strikes, Vec::new());
        assert!(t.pressed_white().contains(KeyId(1)));
        assert!(t.pressed_white().contains(KeyId(3)));
    }

    #[test]
    fn black_key_claims_the_pointer_over_the_white_below() {
        let l = layout();
        let mut t = KeyTracker::new();

        // Inside the Db2 rect, which also lies inside white key 2's rect.
        let out = t.resolve(&TouchEvent::down(vec![p(110.0, 50.0)]), &l);
        assert_eq!(out.strikes.len(), 1);
        assert_eq!(out.strikes[0].key, KeyId(2));
        assert_eq!(out.strikes[0].color, KeyColor::Black);
        assert_eq!(out.strikes[0].sample, SampleId::Db2);
        assert!(t.pressed_black().contains(KeyId(2)));
        assert!(t.pressed_white().is_empty());
    }

    #[test]
    fn pointer_outside_every_key_presses_nothing_and_keeps_the_gate_open() {
        let l = layout();
        let mut t = KeyTracker::new();

        let out = t.resolve(&TouchEvent::down(vec![p(-10.0, 50.0)]), &l);
        assert_eq!(out, Resolution::default());
        assert!(t.pressed_white().is_empty());
        assert!(t.pressed_black().is_empty());

        // The gate only closes once something is actually down, so dragging
        // onto a key still sounds it.
        let out = t.resolve(&TouchEvent::moved(vec![p(50.0, 250.0)]), &l);
        assert_eq!(out.strikes.len(), 1);
        assert_eq!(out.strikes[0].key, KeyId(1));
    }

    #[test]
    fn held_key_survives_another_pointer_moving_elsewhere() {
        let l = layout();
        let mut t = KeyTracker::new();

        t.resolve(&TouchEvent::down(vec![p(50.0, 250.0)]), &l);

        // A second pointer wanders outside every key; the held key must not
        // flicker to released.
        for x in [1450.0, 1500.0, 1600.0] {
            let out = t.resolve(&TouchEvent::moved(vec![p(50.0, 250.0), p(x, 295.0)]), &l);
            assert_eq!(out.releases, Vec::new());
            assert!(t.pressed_white().contains(KeyId(1)));
            assert_eq!(t.pressed_white().len(), 1);
        }
    }

    #[test]
    fn sliding_between_keys_releases_the_old_one() {
        let l = layout();
        let mut t = KeyTracker::new();

        t.resolve(&TouchEvent::down(vec![p(50.0, 250.0)]), &l);
        let out = t.resolve(&TouchEvent::moved(vec![p(150.0, 250.0)]), &l);

        // Gate already closed, so the new key is pressed silently.
        assert_eq!(out.strikes, Vec::new());
        assert_eq!(out.releases.len(), 1);
        assert_eq!(out.releases[0].key, KeyId(1));
        assert!(t.pressed_white().contains(KeyId(2)));
        assert!(!t.pressed_white().contains(KeyId(1)));
    }

    #[test]
    fn cancel_clears_state_and_reopens_the_gate() {
        let l = layout();
        let mut t = KeyTracker::new();

        t.resolve(&TouchEvent::down(vec![p(110.0, 50.0)]), &l);
        let out = t.resolve(
            &TouchEvent {
                phase: TouchPhase::Cancel,
                pointers: Vec::new(),
            },
            &l,
        );
        assert_eq!(out.releases.len(), 1);
        assert!(t.pressed_black().is_empty());

        let out = t.resolve(&TouchEvent::down(vec![p(110.0, 50.0)]), &l);
        assert_eq!(out.strikes.len(), 1);
    }
}
