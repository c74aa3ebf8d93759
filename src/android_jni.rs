use crate::android_frontend::AndroidFrontend;
use crate::touch::{PointerPos, TouchEvent, TouchPhase};

use jni::objects::{JClass, JFloatArray, JIntArray, JShortArray};
use jni::sys::{jint, jlong};
use jni::JNIEnv;

/// Simple JNI hook so an Android Activity can verify the Rust library loads.
#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustInit(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    1
}

#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustCreateFrontend(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    let frontend = Box::new(AndroidFrontend::new());
    Box::into_raw(frontend) as jlong
}

#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustDestroyFrontend(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle as *mut AndroidFrontend));
    }
}

#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustSetSampleRate(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    sample_rate_hz: jint,
) {
    if handle == 0 {
        return;
    }
    let frontend = unsafe { &*(handle as *const AndroidFrontend) };
    frontend.set_sample_rate(sample_rate_hz.max(1) as u32);
}

#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustResize(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    width: jint,
    height: jint,
) {
    if handle == 0 {
        return;
    }
    let frontend = unsafe { &mut *(handle as *mut AndroidFrontend) };
    frontend.resize(width.max(0) as f32, height.max(0) as f32);
}

/// Touch entry point. `xs`/`ys` hold the pointers still down after this
/// event (Java excludes the pointer that just lifted).
///
/// Returns bit 0: needs redraw, bit 1: emit haptic tick.
#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustOnTouch(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    action: jint,
    xs: JFloatArray,
    ys: JFloatArray,
) -> jint {
    if handle == 0 {
        return 0;
    }

    // Action constants from android.view.MotionEvent.
    let phase = match action {
        0 | 5 => TouchPhase::Down, // ACTION_DOWN / ACTION_POINTER_DOWN
        2 | 6 => TouchPhase::Move, // ACTION_MOVE / ACTION_POINTER_UP
        1 => TouchPhase::Up,       // ACTION_UP
        3 => TouchPhase::Cancel,   // ACTION_CANCEL
        _ => return 0,
    };

    let len = env.get_array_length(&xs).unwrap_or(0).max(0) as usize;
    let mut x = vec![0.0f32; len];
    let mut y = vec![0.0f32; len];
    if env.get_float_array_region(&xs, 0, &mut x).is_err()
        || env.get_float_array_region(&ys, 0, &mut y).is_err()
    {
        return 0;
    }

    let pointers = x
        .iter()
        .zip(&y)
        .map(|(&x, &y)| PointerPos { x, y })
        .collect();

    let frontend = unsafe { &mut *(handle as *mut AndroidFrontend) };
    let out = frontend.handle_touch(TouchEvent { phase, pointers });

    let mut bits = 0;
    if out.effects.redraw {
        bits |= 1;
    }
    if out.haptic {
        bits |= 2;
    }
    bits
}

/// Render the keyboard into `out_pixels` (ARGB_8888).
#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustRenderKeys(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    width: jint,
    height: jint,
    out_pixels: JIntArray,
) {
    let w = width.max(0) as usize;
    let h = height.max(0) as usize;
    if handle == 0 || w == 0 || h == 0 {
        return;
    }

    let frontend = unsafe { &*(handle as *const AndroidFrontend) };

    let mut pixels = vec![0xFF000000u32 as i32; w * h];
    frontend.render_pixels(w, h, &mut pixels);

    let _ = env.set_int_array_region(out_pixels, 0, &pixels);
}

/// Legacy AudioTrack pull path: fills `out` with mono i16 samples.
#[no_mangle]
pub extern "system" fn Java_com_rustpiano_app_MainActivity_rustRenderAudio(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    out: JShortArray,
) {
    if handle == 0 {
        return;
    }

    let len = env.get_array_length(&out).unwrap_or(0).max(0) as usize;
    if len == 0 {
        return;
    }

    let frontend = unsafe { &*(handle as *const AndroidFrontend) };

    let mut buf = vec![0i16; len];
    frontend.render_audio_i16(&mut buf);

    let _ = env.set_short_array_region(out, 0, &buf);
}
