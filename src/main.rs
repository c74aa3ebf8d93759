//! # Rust Piano
//!
//! A two-octave touch piano in a window.
//!
//! ## Functionality
//! * **Interaction**: Click or drag across the keys to sound them; black keys
//!     sit over the whites and win the hit-test.
//! * **Sound**: Built-in sampler on the default audio device when available,
//!     otherwise a virtual MIDI port named "Rust Piano Output" to connect to
//!     any synthesizer.
//! * **Visuals**: Pressed keys highlight until released.

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    rust_piano::desktop_frontend::run()
}
