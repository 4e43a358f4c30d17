//! `Java_com_rfvp_launcher_NativeRfvp_*` exports.
//!
//! Handles cross the JNI boundary as `jlong`; `0` is the null handle. Sizes arrive as `jint`
//! and negative values are clamped to zero.

use embedbridge_core::{EngineHandle, LOG_TARGET};
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jdouble, jint, jlong};
use jni::JNIEnv;

use crate::context::AppContext;
use crate::runtime::bridge;
use crate::window::JniSurface;

#[inline]
fn px(v: jint) -> u32 {
    v.max(0) as u32
}

/// A null Java string is an absent value; an unreadable one is logged and treated as absent.
fn opt_string(env: &mut JNIEnv<'_>, s: &JString<'_>, what: &str) -> Option<String> {
    if s.is_null() {
        return None;
    }
    match env.get_string(s) {
        Ok(v) => Some(v.into()),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "{what}: GetStringUTFChars failed: {e}");
            None
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_nativeInitAndroidContext<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    app_context: JObject<'local>,
) {
    let app = AppContext::new(&env, &app_context);
    // Failures are already logged by the bridge.
    let _ = bridge().register_context(app.as_ref());
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_create<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    surface: JObject<'local>,
    width_px: jint,
    height_px: jint,
    scale: jdouble,
    game_dir_utf8: JString<'local>,
    nls_utf8: JString<'local>,
) -> jlong {
    let game_dir = opt_string(&mut env, &game_dir_utf8, "create(game_dir)");
    let nls = opt_string(&mut env, &nls_utf8, "create(nls)");
    let surface = JniSurface::new(&env, &surface);

    bridge()
        .create(
            surface.as_ref(),
            px(width_px),
            px(height_px),
            scale,
            game_dir.as_deref(),
            nls.as_deref(),
        )
        .to_i64()
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_step<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    dt_ms: jint,
) -> jint {
    bridge().step(EngineHandle::from_i64(handle), px(dt_ms))
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_resize<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    width_px: jint,
    height_px: jint,
) {
    bridge().resize(EngineHandle::from_i64(handle), px(width_px), px(height_px));
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_setSurface<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    surface: JObject<'local>,
    width_px: jint,
    height_px: jint,
) {
    let surface = JniSurface::new(&env, &surface);
    bridge().set_surface(
        EngineHandle::from_i64(handle),
        surface.as_ref(),
        px(width_px),
        px(height_px),
    );
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_touch<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    phase: jint,
    x_px: jdouble,
    y_px: jdouble,
) {
    bridge().touch(EngineHandle::from_i64(handle), phase, x_px, y_px);
}

#[no_mangle]
pub extern "system" fn Java_com_rfvp_launcher_NativeRfvp_destroy<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) {
    bridge().destroy(EngineHandle::from_i64(handle));
}
