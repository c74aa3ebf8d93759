pub mod engine;
pub mod geometry;
pub mod keys;
pub mod layout;
pub mod render;
pub mod touch;
pub mod ui_events;

pub mod sampler;

#[cfg(feature = "sampler")]
pub mod output_sampler;

#[cfg(feature = "midi")]
pub mod output_midi;

#[cfg(feature = "android")]
pub mod android_frontend;

#[cfg(all(target_os = "android", feature = "android"))]
pub mod android_jni;

#[cfg(all(feature = "desktop", feature = "midi"))]
pub mod desktop_frontend;
