use std::{
    cell::Cell,
    marker::PhantomData,
    panic::{self, PanicHookInfo},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Process-wide hook bookkeeping, shared by every live guard.
struct HookState {
    active: usize,
    previous: Option<Arc<PanicHook>>,
}

static HOOK_STATE: Mutex<HookState> = Mutex::new(HookState {
    active: 0,
    previous: None,
});

thread_local! {
    static SILENCED: Cell<usize> = const { Cell::new(0) };
}

/// Silences the process panic hook on the current thread for as long as it
/// lives.
///
/// Panics inside tests are reported by the formatter, so on threads holding a
/// guard the installed hook only forwards the panic location to `tracing`.
/// Panics on every other thread still reach the previous hook.
///
/// The hook is installed by the first live guard in the process and the
/// previous hook is restored when the last one is dropped, so runs may overlap
/// and finish in any order.
pub struct PanicHookGuard {
    // the thread-local count has to be released on the installing thread
    _not_send: PhantomData<*const ()>,
}

impl PanicHookGuard {
    pub fn install() -> Self {
        let mut state = HOOK_STATE.lock().unwrap_or_else(PoisonError::into_inner);
        if state.active == 0 {
            let previous = Arc::new(panic::take_hook());
            let forward = Arc::clone(&previous);
            panic::set_hook(Box::new(move |panic_hook_info| {
                if SILENCED.with(Cell::get) == 0 {
                    return forward(panic_hook_info);
                }

                let location = panic_hook_info
                    .location()
                    .map(|location| location.to_string())
                    .unwrap_or_default();
                tracing::debug!(%location, "test panicked");
            }));
            state.previous = Some(previous);
        }
        state.active += 1;
        SILENCED.with(|silenced| silenced.set(silenced.get() + 1));

        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        SILENCED.with(|silenced| silenced.set(silenced.get().saturating_sub(1)));

        let mut state = HOOK_STATE.lock().unwrap_or_else(PoisonError::into_inner);
        state.active = state.active.saturating_sub(1);
        if state.active > 0 || thread::panicking() {
            return;
        }

        if let Some(previous) = state.previous.take() {
            // drops the silencing hook and with it the second handle on `previous`
            drop(panic::take_hook());
            let hook: PanicHook = match Arc::try_unwrap(previous) {
                Ok(hook) => hook,
                Err(shared) => Box::new(move |info: &PanicHookInfo<'_>| shared(info)),
            };
            panic::set_hook(hook);
        }
    }
}
