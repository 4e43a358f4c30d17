use std::ffi::{c_char, c_void};
use std::fmt;

// ---------------------------------------------------------------------------
// Engine ABI
// ---------------------------------------------------------------------------

/// `create(window_ref, w, h, scale, game_dir_utf8, locale_utf8) -> handle | null`
pub type CreateFn = unsafe extern "C" fn(
    window: *mut c_void,
    width_px: u32,
    height_px: u32,
    scale: f64,
    game_dir_utf8: *const c_char,
    locale_utf8: *const c_char,
) -> *mut c_void;

/// Returns 0 to continue, non-zero when the engine wants to stop.
pub type StepFn = unsafe extern "C" fn(handle: *mut c_void, dt_ms: u32) -> i32;

pub type ResizeFn = unsafe extern "C" fn(handle: *mut c_void, width_px: u32, height_px: u32);

pub type SetSurfaceFn =
    unsafe extern "C" fn(handle: *mut c_void, window: *mut c_void, width_px: u32, height_px: u32);

/// `phase`: 0 began, 1 moved, 2 ended, 3 cancelled.
pub type TouchFn = unsafe extern "C" fn(handle: *mut c_void, phase: i32, x: f64, y: f64);

pub type DestroyFn = unsafe extern "C" fn(handle: *mut c_void);

/// `init_context(env_handle, durable_app_ref)`.
pub type InitContextFn = unsafe extern "C" fn(env: *mut c_void, app: *mut c_void);

pub type PumpCreateFn =
    unsafe extern "C" fn(game_root_utf8: *const c_char, locale_utf8: *const c_char) -> *mut c_void;

/// 0 continue, 1 exit requested, 2 invalid handle.
pub type PumpStepFn = unsafe extern "C" fn(handle: *mut c_void, timeout_ms: u32) -> i32;

pub type PumpDestroyFn = unsafe extern "C" fn(handle: *mut c_void);

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Named function slot of the API table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Create,
    Step,
    Resize,
    SetSurface,
    Touch,
    Destroy,
    InitContext,
    PumpCreate,
    PumpStep,
    PumpDestroy,
}

impl Slot {
    /// Slots every surface-hosted engine must export.
    pub const MANDATORY: [Slot; 6] = [
        Slot::Create,
        Slot::Step,
        Slot::Resize,
        Slot::SetSurface,
        Slot::Touch,
        Slot::Destroy,
    ];

    pub const PUMP: [Slot; 3] = [Slot::PumpCreate, Slot::PumpStep, Slot::PumpDestroy];

    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            Slot::Create | Slot::PumpCreate => "create",
            Slot::Step | Slot::PumpStep => "step",
            Slot::Resize => "resize",
            Slot::SetSurface => "set_surface",
            Slot::Touch => "touch",
            Slot::Destroy | Slot::PumpDestroy => "destroy",
            Slot::InitContext => "init_context",
        }
    }

    #[inline]
    pub const fn is_pump(self) -> bool {
        matches!(self, Slot::PumpCreate | Slot::PumpStep | Slot::PumpDestroy)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pump() {
            write!(f, "pump_{}", self.suffix())
        } else {
            f.write_str(self.suffix())
        }
    }
}

// ---------------------------------------------------------------------------
// Symbol names
// ---------------------------------------------------------------------------

/// Well-known exported symbol names, derived from per-mode prefixes.
///
/// `rfvp_android` yields `rfvp_android_create`, `rfvp_android_step`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoints {
    pub prefix: String,
    pub pump_prefix: Option<String>,
    /// Mandatory slots this engine build may legitimately leave out.
    pub optional: Vec<Slot>,
}

impl EntryPoints {
    #[inline]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pump_prefix: None,
            optional: Vec::new(),
        }
    }

    #[inline]
    pub fn with_pump_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.pump_prefix = Some(prefix.into());
        self
    }

    /// Downgrade mandatory slots to optional (the iOS engine has no set_surface or touch).
    #[inline]
    pub fn with_optional(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.optional.extend(slots);
        self
    }

    /// Whether an absent `slot` is an error for this engine build.
    #[inline]
    pub fn is_required(&self, slot: Slot) -> bool {
        Slot::MANDATORY.contains(&slot) && !self.optional.contains(&slot)
    }

    /// Symbol for `slot`, or `None` when the slot's mode is not configured.
    pub fn symbol(&self, slot: Slot) -> Option<String> {
        let prefix = if slot.is_pump() {
            self.pump_prefix.as_deref()?
        } else {
            self.prefix.as_str()
        };
        Some(format!("{}_{}", prefix, slot.suffix()))
    }
}

// ---------------------------------------------------------------------------
// API table
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Default)]
pub struct PumpApi {
    pub create: Option<PumpCreateFn>,
    pub step: Option<PumpStepFn>,
    pub destroy: Option<PumpDestroyFn>,
}

/// Resolved engine entry points. Each slot is bound or permanently absent.
///
/// Built once by an [`EngineBinding`](crate::binding::EngineBinding) and read-only afterwards.
#[derive(Clone, Copy, Default)]
pub struct EngineApi {
    pub create: Option<CreateFn>,
    pub step: Option<StepFn>,
    pub resize: Option<ResizeFn>,
    pub set_surface: Option<SetSurfaceFn>,
    pub touch: Option<TouchFn>,
    pub destroy: Option<DestroyFn>,
    pub init_context: Option<InitContextFn>,
    pub pump: PumpApi,
}

impl EngineApi {
    /// Every slot absent: what dependents see when the engine binary is missing.
    #[inline]
    pub const fn unbound() -> Self {
        Self {
            create: None,
            step: None,
            resize: None,
            set_surface: None,
            touch: None,
            destroy: None,
            init_context: None,
            pump: PumpApi {
                create: None,
                step: None,
                destroy: None,
            },
        }
    }

    pub fn is_bound(&self, slot: Slot) -> bool {
        match slot {
            Slot::Create => self.create.is_some(),
            Slot::Step => self.step.is_some(),
            Slot::Resize => self.resize.is_some(),
            Slot::SetSurface => self.set_surface.is_some(),
            Slot::Touch => self.touch.is_some(),
            Slot::Destroy => self.destroy.is_some(),
            Slot::InitContext => self.init_context.is_some(),
            Slot::PumpCreate => self.pump.create.is_some(),
            Slot::PumpStep => self.pump.step.is_some(),
            Slot::PumpDestroy => self.pump.destroy.is_some(),
        }
    }

    pub fn missing_mandatory(&self) -> Vec<Slot> {
        Slot::MANDATORY
            .into_iter()
            .filter(|s| !self.is_bound(*s))
            .collect()
    }

    /// Unbound slots that `eps` declares required.
    pub fn missing_required(&self, eps: &EntryPoints) -> Vec<Slot> {
        Slot::MANDATORY
            .into_iter()
            .filter(|s| eps.is_required(*s) && !self.is_bound(*s))
            .collect()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        Slot::MANDATORY.iter().all(|s| self.is_bound(*s))
    }
}

impl fmt::Debug for EngineApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = Slot::MANDATORY
            .iter()
            .chain(std::iter::once(&Slot::InitContext))
            .chain(Slot::PUMP.iter());

        let mut list = f.debug_map();
        for slot in all {
            list.entry(
                &format_args!("{slot}"),
                &if self.is_bound(*slot) { "bound" } else { "unbound" },
            );
        }
        list.finish()
    }
}
