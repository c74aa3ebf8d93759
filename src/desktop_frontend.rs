use crate::engine::Effects;
use crate::keys::SampleId;
use crate::output_midi::MidiBackend;
use crate::render::{scene, DrawColor, DrawOp};
use crate::touch::{PointerPos, TouchEvent};
use crate::ui_events::{UiEvent, UiSession};

#[cfg(feature = "sampler")]
use crate::output_sampler::SamplerBackend;

#[cfg(any(target_os = "linux", target_os = "macos"))]
use midir::os::unix::VirtualOutput;

use midir::{MidiOutput, MidiOutputConnection};
use softbuffer::{Context, Surface};
use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

const MIDI_CHANNEL: u8 = 0;
const MIDI_PROGRAM: u8 = 0; // Acoustic Grand Piano (zero-based)

const COLOR_WHITE: u32 = 0x00FFFFFF;
const COLOR_BLACK: u32 = 0x00000000;
const COLOR_PRESSED: u32 = 0x00FFFF00; // yellow, matching the pressed fill

/// Key separators are drawn a few pixels wide so they read at a glance.
const SEPARATOR_WIDTH: i32 = 3;

pub fn run() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // 1. Setup MIDI Output
    let midi_out = MidiOutput::new("Rust Piano Client")?;
    let mut conn_out: Option<MidiOutputConnection> = None;

    // Attempt to create virtual port on systems where that exists
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    match midi_out.create_virtual("Rust Piano Output") {
        Ok(conn) => {
            log::info!("Created virtual MIDI port: 'Rust Piano Output'");
            conn_out = Some(conn);
        }
        Err(_) => {
            // Fallback for non-ALSA environments or errors
            let midi_out = MidiOutput::new("Rust Piano Client")?;
            let ports = midi_out.ports();
            if let Some(port) = ports.first() {
                log::info!(
                    "Virtual port failed. Connecting to first available hardware port: {}",
                    midi_out.port_name(port)?
                );
                conn_out = Some(midi_out.connect(port, "Rust Piano Connection")?);
            } else {
                eprintln!("Warning: No MIDI ports found.");
            }
        }
    }

    #[cfg(target_os = "windows")]
    if let Some(port) = midi_out.ports().first() {
        log::info!(
            "Connecting to hardware MIDI port: {}",
            midi_out.port_name(port)?
        );
        conn_out = Some(midi_out.connect(port, "Rust Piano Connection")?);
    } else {
        eprintln!("Warning: No MIDI ports found.");
    }

    let mut audio = DesktopAudio::new(MidiBackend::new(conn_out, MIDI_CHANNEL));

    // If we have a connection, set the instrument
    if let Some(conn) = audio.midi.conn_mut() {
        let _ = conn.send(&[0xC0 | MIDI_CHANNEL, MIDI_PROGRAM]);
    }

    // Setup Window
    let event_loop = EventLoop::new()?;
    let window = Rc::new(
        WindowBuilder::new()
            .with_title("Rust Piano")
            .with_inner_size(winit::dpi::LogicalSize::new(980.0, 280.0))
            .build(&event_loop)?,
    );

    // Setup Graphics Context and UX state
    let context = Context::new(window.clone()).expect("Failed to create graphics context");
    let mut surface = Surface::new(&context, window.clone()).expect("Failed to create surface");
    let mut prev_pos: Option<(f32, f32)> = None;
    let mut is_mouse_down = false;

    let mut ui = UiSession::new();

    // 4. Run Event Loop
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    audio.stop_pressed(&ui);
                    elwt.exit();
                }

                WindowEvent::Resized(physical_size) => {
                    surface
                        .resize(
                            NonZeroU32::new(physical_size.width).unwrap(),
                            NonZeroU32::new(physical_size.height).unwrap(),
                        )
                        .unwrap();

                    let _ = ui.handle(UiEvent::Resized {
                        width: physical_size.width as f32,
                        height: physical_size.height as f32,
                    });

                    draw_keys(&mut surface, physical_size.width, physical_size.height, &ui);
                }

                WindowEvent::MouseInput { state, button, .. } => {
                    if button == winit::event::MouseButton::Left {
                        let pressed = state == winit::event::ElementState::Pressed;
                        is_mouse_down = pressed;

                        let Some((x, y)) = prev_pos else {
                            return;
                        };

                        let te = if pressed {
                            TouchEvent::down(vec![PointerPos { x, y }])
                        } else {
                            TouchEvent::up()
                        };
                        let out = ui.handle(UiEvent::Touch(te));
                        process_effects(out.effects, &mut audio, &window);
                    }
                }

                WindowEvent::CursorMoved { position, .. } => {
                    let curr = (position.x as f32, position.y as f32);

                    if is_mouse_down {
                        let out = ui.handle(UiEvent::Touch(TouchEvent::moved(vec![PointerPos {
                            x: curr.0,
                            y: curr.1,
                        }])));
                        process_effects(out.effects, &mut audio, &window);
                    }

                    prev_pos = Some(curr);
                }

                WindowEvent::RedrawRequested => {
                    let size = window.inner_size();
                    draw_keys(&mut surface, size.width, size.height, &ui);
                }

                _ => {}
            },
            _ => {}
        }
    })?;

    Ok(())
}

struct DesktopAudio {
    midi: MidiBackend,
    #[cfg(feature = "sampler")]
    sampler: Option<SamplerBackend>,
}

impl DesktopAudio {
    fn new(midi: MidiBackend) -> Self {
        #[cfg(feature = "sampler")]
        let sampler = match SamplerBackend::new() {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("sampler unavailable ({e}); falling back to MIDI");
                None
            }
        };

        Self {
            midi,
            #[cfg(feature = "sampler")]
            sampler,
        }
    }

    fn play_sample(&mut self, sample: SampleId) {
        #[cfg(feature = "sampler")]
        if let Some(s) = &self.sampler {
            s.play_sample(sample);
            return;
        }
        self.midi.play_sample(sample);
    }

    fn stop_sample(&mut self, sample: SampleId) {
        // The built-in sampler is one-shot; only MIDI needs note-offs.
        #[cfg(feature = "sampler")]
        if self.sampler.is_some() {
            return;
        }
        self.midi.stop_sample(sample);
    }

    /// Note-off for everything still held, so closing the window doesn't
    /// leave MIDI notes hanging.
    fn stop_pressed(&mut self, ui: &UiSession) {
        let engine = ui.engine();
        let samples: Vec<SampleId> = engine
            .layout()
            .whites()
            .iter()
            .filter(|k| engine.pressed_white().contains(k.id))
            .chain(
                engine
                    .layout()
                    .blacks()
                    .iter()
                    .filter(|k| engine.pressed_black().contains(k.id)),
            )
            .map(|k| k.sample)
            .collect();
        for sample in samples {
            self.midi.stop_sample(sample);
        }
    }
}

fn process_effects(effects: Effects, audio: &mut DesktopAudio, window: &Window) {
    if effects.redraw {
        window.request_redraw();
    }

    // Stop before play so a restruck key doesn't have its fresh note cut.
    for r in effects.releases {
        audio.stop_sample(r.sample);
    }
    for s in effects.strikes {
        log::debug!("strike {}", s.sample.name());
        audio.play_sample(s.sample);
    }
}

fn pixel_color(color: DrawColor) -> u32 {
    match color {
        DrawColor::White => COLOR_WHITE,
        DrawColor::Black => COLOR_BLACK,
        DrawColor::Pressed => COLOR_PRESSED,
    }
}

fn draw_keys(surface: &mut Surface<Rc<Window>, Rc<Window>>, width: u32, height: u32, ui: &UiSession) {
    let mut buffer = surface.buffer_mut().unwrap();
    buffer.fill(0);

    let engine = ui.engine();
    let ops = scene(engine.layout(), engine.pressed_white(), engine.pressed_black());

    let w = width as usize;
    let h = height as usize;

    for op in ops {
        match op {
            DrawOp::FillRect { rect, color } => {
                fill_rect(
                    &mut buffer,
                    w,
                    h,
                    rect.left.round() as i32,
                    rect.top.round() as i32,
                    rect.right.round() as i32,
                    rect.bottom.round() as i32,
                    pixel_color(color),
                );
            }
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
                    &mut buffer,
                    w,
                    h,
                    x - SEPARATOR_WIDTH / 2,
                    y1.round() as i32,
                    x - SEPARATOR_WIDTH / 2 + SEPARATOR_WIDTH,
                    y2.round() as i32,
                    pixel_color(color),
                );
            }
        }
    }

    buffer.present().unwrap();
}

fn fill_rect(buf: &mut [u32], w: usize, h: usize, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
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
