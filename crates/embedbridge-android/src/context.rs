use std::ffi::c_void;

use embedbridge_core::{BridgeError, BridgeResult, ContextSource, DurableRef, EnvHandle};
use jni::objects::{GlobalRef, JObject};
use jni::JNIEnv;

/// JNI GlobalRef to the application `Context`, valid on every thread.
pub struct AppGlobal(GlobalRef);

impl DurableRef for AppGlobal {
    #[inline]
    fn as_ptr(&self) -> *mut c_void {
        self.0.as_obj().as_raw().cast()
    }
}

/// The `Context` passed to `nativeInitAndroidContext`, with the env of the calling thread.
pub struct AppContext<'a, 'local> {
    env: &'a JNIEnv<'local>,
    app: &'a JObject<'local>,
}

impl<'a, 'local> AppContext<'a, 'local> {
    /// `None` for a null Java reference.
    pub fn new(env: &'a JNIEnv<'local>, app: &'a JObject<'local>) -> Option<Self> {
        (!app.is_null()).then_some(Self { env, app })
    }
}

impl ContextSource for AppContext<'_, '_> {
    type Durable = AppGlobal;

    fn env_handle(&self) -> BridgeResult<EnvHandle> {
        let vm = self
            .env
            .get_java_vm()
            .map_err(|e| BridgeError::ContextAcquireFailed(format!("GetJavaVM failed: {e}")))?;
        EnvHandle::new(vm.get_java_vm_pointer().cast())
            .ok_or_else(|| BridgeError::ContextAcquireFailed("GetJavaVM returned null".into()))
    }

    fn acquire_durable(&self) -> BridgeResult<AppGlobal> {
        self.env
            .new_global_ref(self.app)
            .map(AppGlobal)
            .map_err(|e| BridgeError::ContextAcquireFailed(format!("NewGlobalRef failed: {e}")))
    }
}
