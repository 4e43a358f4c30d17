#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_void, CStr};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use embedbridge_core::{
    Bridge, BridgeError, BridgeResult, EngineApi, NativeWindow, PumpApi, StaticBinding,
    SurfaceSource,
};
use raw_window_handle::{AndroidNdkWindowHandle, RawWindowHandle};

/// Everything the fake engine and the fake platform observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Acquire { window: usize },
    Release { window: usize },
    Create {
        window: usize,
        width: u32,
        height: u32,
        scale: f64,
        game_dir: Option<String>,
        locale: Option<String>,
    },
    Step { handle: usize, dt_ms: u32 },
    Resize { handle: usize, width: u32, height: u32 },
    SetSurface { handle: usize, window: usize, width: u32, height: u32 },
    Touch { handle: usize, phase: i32, x: f64, y: f64 },
    Destroy { handle: usize },
    PumpCreate { game_root: String, locale: String },
    PumpStep { handle: usize, timeout_ms: u32 },
    PumpDestroy { handle: usize },
}

thread_local! {
    static JOURNAL: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
    static FAIL_CREATE: Cell<bool> = const { Cell::new(false) };
    static FORCED_HANDLE: Cell<usize> = const { Cell::new(0) };
    static STEP_RESULT: Cell<i32> = const { Cell::new(0) };
}

// Shared across threads so concurrent tests never mint colliding handles.
static NEXT_HANDLE: AtomicUsize = AtomicUsize::new(0x1000);

fn record(call: Call) {
    JOURNAL.with(|j| j.borrow_mut().push(call));
}

pub fn journal() -> Vec<Call> {
    JOURNAL.with(|j| j.borrow().clone())
}

pub fn clear_journal() {
    JOURNAL.with(|j| j.borrow_mut().clear());
}

pub fn releases_of(window: usize) -> usize {
    journal()
        .iter()
        .filter(|c| **c == Call::Release { window })
        .count()
}

pub fn acquires_of(window: usize) -> usize {
    journal()
        .iter()
        .filter(|c| **c == Call::Acquire { window })
        .count()
}

pub fn position(call: &Call) -> Option<usize> {
    journal().iter().position(|c| c == call)
}

pub fn fail_next_create(fail: bool) {
    FAIL_CREATE.with(|f| f.set(fail));
}

pub fn force_handle(handle: usize) {
    FORCED_HANDLE.with(|h| h.set(handle));
}

pub fn set_step_result(status: i32) {
    STEP_RESULT.with(|s| s.set(status));
}

fn opt_str(p: *const c_char) -> Option<String> {
    if p.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
}

fn mint_handle() -> *mut c_void {
    let forced = FORCED_HANDLE.with(|h| h.get());
    let raw = if forced != 0 {
        forced
    } else {
        NEXT_HANDLE.fetch_add(0x10, Ordering::SeqCst)
    };
    raw as *mut c_void
}

// ---------------------------------------------------------------------------
// Fake engine entry points
// ---------------------------------------------------------------------------

unsafe extern "C" fn fake_create(
    window: *mut c_void,
    width_px: u32,
    height_px: u32,
    scale: f64,
    game_dir: *const c_char,
    locale: *const c_char,
) -> *mut c_void {
    record(Call::Create {
        window: window as usize,
        width: width_px,
        height: height_px,
        scale,
        game_dir: opt_str(game_dir),
        locale: opt_str(locale),
    });
    if FAIL_CREATE.with(|f| f.get()) {
        return std::ptr::null_mut();
    }
    mint_handle()
}

unsafe extern "C" fn fake_step(handle: *mut c_void, dt_ms: u32) -> i32 {
    record(Call::Step {
        handle: handle as usize,
        dt_ms,
    });
    STEP_RESULT.with(|s| s.get())
}

unsafe extern "C" fn fake_resize(handle: *mut c_void, width_px: u32, height_px: u32) {
    record(Call::Resize {
        handle: handle as usize,
        width: width_px,
        height: height_px,
    });
}

unsafe extern "C" fn fake_set_surface(
    handle: *mut c_void,
    window: *mut c_void,
    width_px: u32,
    height_px: u32,
) {
    record(Call::SetSurface {
        handle: handle as usize,
        window: window as usize,
        width: width_px,
        height: height_px,
    });
}

unsafe extern "C" fn fake_touch(handle: *mut c_void, phase: i32, x: f64, y: f64) {
    record(Call::Touch {
        handle: handle as usize,
        phase,
        x,
        y,
    });
}

unsafe extern "C" fn fake_destroy(handle: *mut c_void) {
    record(Call::Destroy {
        handle: handle as usize,
    });
}

unsafe extern "C" fn fake_pump_create(game_root: *const c_char, locale: *const c_char) -> *mut c_void {
    record(Call::PumpCreate {
        game_root: opt_str(game_root).unwrap_or_default(),
        locale: opt_str(locale).unwrap_or_default(),
    });
    if FAIL_CREATE.with(|f| f.get()) {
        return std::ptr::null_mut();
    }
    mint_handle()
}

unsafe extern "C" fn fake_pump_step(handle: *mut c_void, timeout_ms: u32) -> i32 {
    record(Call::PumpStep {
        handle: handle as usize,
        timeout_ms,
    });
    STEP_RESULT.with(|s| s.get())
}

unsafe extern "C" fn fake_pump_destroy(handle: *mut c_void) {
    record(Call::PumpDestroy {
        handle: handle as usize,
    });
}

/// A complete engine: every mandatory slot, no init_context.
pub fn fake_api() -> EngineApi {
    EngineApi {
        create: Some(fake_create),
        step: Some(fake_step),
        resize: Some(fake_resize),
        set_surface: Some(fake_set_surface),
        touch: Some(fake_touch),
        destroy: Some(fake_destroy),
        init_context: None,
        pump: PumpApi {
            create: Some(fake_pump_create),
            step: Some(fake_pump_step),
            destroy: Some(fake_pump_destroy),
        },
    }
}

// ---------------------------------------------------------------------------
// Fake platform surfaces
// ---------------------------------------------------------------------------

/// Reference-counted window double: acquisition and release are journaled.
#[derive(Debug)]
pub struct TestWindow {
    id: usize,
}

impl NativeWindow for TestWindow {
    fn raw_window_handle(&self) -> RawWindowHandle {
        let p = NonNull::new(self.id as *mut c_void).expect("window ids are non-zero");
        RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::new(p))
    }
}

impl Drop for TestWindow {
    fn drop(&mut self) {
        record(Call::Release { window: self.id });
    }
}

/// Platform surface object. `id` doubles as the native window pointer value.
#[derive(Debug, Clone, Copy)]
pub struct TestSurface {
    pub id: usize,
    pub refuse: bool,
}

impl TestSurface {
    pub fn new(id: usize) -> Self {
        Self { id, refuse: false }
    }

    /// A surface the platform refuses to turn into a window.
    pub fn refusing(id: usize) -> Self {
        Self { id, refuse: true }
    }
}

impl SurfaceSource for TestSurface {
    type Window = TestWindow;

    fn acquire_window(&self) -> BridgeResult<TestWindow> {
        if self.refuse {
            return Err(BridgeError::WindowAcquireFailed);
        }
        record(Call::Acquire { window: self.id });
        Ok(TestWindow { id: self.id })
    }
}

pub type TestBridge = Bridge<StaticBinding, TestWindow>;

pub fn bridge_with(api: EngineApi) -> TestBridge {
    clear_journal();
    fail_next_create(false);
    force_handle(0);
    set_step_result(0);
    Bridge::new(StaticBinding::from_api(api))
}

pub fn bridge() -> TestBridge {
    bridge_with(fake_api())
}
