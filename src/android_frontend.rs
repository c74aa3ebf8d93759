use crate::layout::KeyboardLayout;
use crate::render::{scene, DrawColor, DrawOp};
use crate::sampler::Sampler;
use crate::touch::TouchEvent;
use crate::ui_events::{UiEvent, UiOutput, UiSession};

use std::sync::Mutex;

const ARGB_WHITE: i32 = 0xFFFFFFFFu32 as i32;
const ARGB_BLACK: i32 = 0xFF000000u32 as i32;
const ARGB_PRESSED: i32 = 0xFFFFFF00u32 as i32;

const SEPARATOR_WIDTH: i32 = 3;

/// Android-facing wrapper that owns the core session + sampler.
///
/// Audio rendering is pulled from a Java AudioTrack thread, so the sampler
/// sits behind a Mutex rather than a channel.
pub struct AndroidFrontend {
    ui: UiSession,
    sampler: Mutex<Sampler>,
}

impl AndroidFrontend {
    pub fn new() -> Self {
        Self {
            ui: UiSession::new(),
            sampler: Mutex::new(Sampler::new(48_000)),
        }
    }

    pub fn set_sample_rate(&self, sample_rate_hz: u32) {
        self.sampler.lock().unwrap().set_sample_rate(sample_rate_hz);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let _ = self.ui.handle(UiEvent::Resized { width, height });
    }

    /// Feeds one touch event through the session and sounds any strikes.
    pub fn handle_touch(&mut self, event: TouchEvent) -> UiOutput {
        let out = self.ui.handle(UiEvent::Touch(event));
        if !out.effects.strikes.is_empty() {
            let mut sampler = self.sampler.lock().unwrap();
            for s in &out.effects.strikes {
                sampler.strike(s.sample);
            }
        }
        out
    }

    /// Renders the keyboard into an ARGB_8888 pixel buffer.
    ///
    /// The layout is recomputed from the buffer size so the bitmap never
    /// depends on a resize call having arrived first.
    pub fn render_pixels(&self, width: usize, height: usize, pixels: &mut [i32]) {
        if pixels.len() < width * height {
            return;
        }

        let layout = KeyboardLayout::compute(width as f32, height as f32);
        let engine = self.ui.engine();
        let ops = scene(&layout, engine.pressed_white(), engine.pressed_black());

        for op in ops {
            match op {
                DrawOp::FillRect { rect, color } => fill_rect(
                    pixels,
                    width,
                    height,
                    rect.left.round() as i32,
                    rect.top.round() as i32,
                    rect.right.round() as i32,
                    rect.bottom.round() as i32,
                    argb(color),
                ),
                DrawOp::Line {
                    x1,
                    y1,
                    x2: _,
                    y2,
                    color,
                } => {
                    // The scene only emits vertical separators.
                    let x = x1.round() as i32;
                    fill_rect(
                        pixels,
                        width,
                        height,
                        x - SEPARATOR_WIDTH / 2,
                        y1.round() as i32,
                        x - SEPARATOR_WIDTH / 2 + SEPARATOR_WIDTH,
                        y2.round() as i32,
                        argb(color),
                    );
                }
            }
        }
    }

    /// Legacy AudioTrack pull path: mixes the sampler into a mono i16 buffer.
    pub fn render_audio_i16(&self, out: &mut [i16]) {
        self.sampler.lock().unwrap().render_i16_mono(out);
    }
}

impl Default for AndroidFrontend {
    fn default() -> Self {
        Self::new()
    }
}

fn argb(color: DrawColor) -> i32 {
    match color {
        DrawColor::White => ARGB_WHITE,
        DrawColor::Black => ARGB_BLACK,
        DrawColor::Pressed => ARGB_PRESSED,
    }
}

fn fill_rect(
    buf: &mut [i32],
    w: usize,
    h: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: i32,
) {
    let x0 = x0.max(0) as usize;
    let y0 = y0.max(0) as usize;
    let x1 = x1.min(w as i32).max(0) as usize;
    let y1 = y1.min(h as i32).max(0) as usize;

    for y in y0..y1 {
        let row = y * w;
        for x in x0..x1 {
            buf[row + x] = color;
        }
    }
}
