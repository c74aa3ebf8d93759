use crate::keys::{MidiNote, SampleId};

use midir::MidiOutputConnection;

const STRIKE_VELOCITY: u8 = 100;

/// Sample playback over MIDI: a strike becomes note-on at a fixed velocity,
/// a release becomes note-off. With no connection every send is a no-op.
pub struct MidiBackend {
    conn: Option<MidiOutputConnection>,
    channel: u8,
}

impl MidiBackend {
    pub fn new(conn: Option<MidiOutputConnection>, channel: u8) -> Self {
        Self { conn, channel }
    }

    pub fn conn_mut(&mut self) -> Option<&mut MidiOutputConnection> {
        self.conn.as_mut()
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    fn send_note_on(&mut self, note: MidiNote, vel: u8) {
        if vel == 0 {
            self.send_note_off(note);
            return;
        }
        if let Some(c) = self.conn.as_mut() {
            let on = 0x90 | (self.channel & 0x0F);
            let _ = c.send(&[on, note.0, vel]);
        }
    }

    fn send_note_off(&mut self, note: MidiNote) {
        if let Some(c) = self.conn.as_mut() {
            let off = 0x80 | (self.channel & 0x0F);
            let _ = c.send(&[off, note.0, 0]);
        }
    }

    pub fn play_sample(&mut self, sample: SampleId) {
        // Off first so a restruck key rearticulates cleanly.
        self.send_note_off(sample.midi_note());
        self.send_note_on(sample.midi_note(), STRIKE_VELOCITY);
    }

    pub fn stop_sample(&mut self, sample: SampleId) {
        self.send_note_off(sample.midi_note());
    }
}
