//! Shared bookkeeping for hooks, subclassed windows, and in-flight
//! interception callbacks.
//!
//! This is the only state in the engine touched by more than one
//! thread. The two sets are guarded by mutexes held only for the
//! read-modify-write itself — never across a Win32 call that could
//! re-enter the engine — and the in-flight counter is a plain atomic.
//!
//! Teardown protocol: [`HookRegistry::begin_shutdown`] stops further
//! installs, the caller drains both sets and releases the underlying
//! Win32 resources, then [`HookRegistry::wait_for_idle`] blocks until
//! every callback that was already on a hooked path has returned. Only
//! after that is it safe to consider the module's code unloadable.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// How long the teardown drain sleeps between polls of the in-flight
/// counter. Callbacks are short (they run inline in a message pump), so
/// the wait is expected to be brief.
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

static REGISTRY: OnceLock<HookRegistry> = OnceLock::new();

/// Returns the process-wide registry.
pub fn registry() -> &'static HookRegistry {
    REGISTRY.get_or_init(HookRegistry::new)
}

/// Lock-guarded sets of installed hooks and subclassed windows, plus
/// the in-flight callback count.
pub struct HookRegistry {
    shutting_down: AtomicBool,
    in_flight: AtomicUsize,
    subclassed: Mutex<HashSet<usize>>,
    hooks: Mutex<HashSet<isize>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            shutting_down: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            subclassed: Mutex::new(HashSet::new()),
            hooks: Mutex::new(HashSet::new()),
        }
    }

    /// Marks the start of an interception callback. The returned guard
    /// decrements the count when dropped, including on unwind.
    pub fn enter(&self) -> CallScope<'_> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        CallScope { registry: self }
    }

    /// Flags the registry as shutting down; refuses all installs from
    /// this point on.
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Reserves a subclass slot for a window.
    ///
    /// Returns false if the window is already subclassed or shutdown
    /// has begun. The caller performs the actual `SetWindowSubclass`
    /// outside this lock and must call [`release_subclass`]
    /// (Self::release_subclass) if the install fails.
    pub fn reserve_subclass(&self, hwnd: usize) -> bool {
        if self.is_shutting_down() {
            return false;
        }
        let Ok(mut set) = self.subclassed.lock() else {
            return false;
        };
        set.insert(hwnd)
    }

    /// Erases a window from the subclass set (failed install, or the
    /// window's subclass was removed).
    pub fn release_subclass(&self, hwnd: usize) {
        if let Ok(mut set) = self.subclassed.lock() {
            set.remove(&hwnd);
        }
    }

    /// Atomically takes every registered window, leaving the set empty.
    pub fn drain_subclassed(&self) -> Vec<usize> {
        match self.subclassed.lock() {
            Ok(mut set) => set.drain().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Records an installed hook. Returns false during shutdown, in
    /// which case the caller must immediately unhook.
    pub fn register_hook(&self, hook: isize) -> bool {
        if self.is_shutting_down() {
            return false;
        }
        let Ok(mut set) = self.hooks.lock() else {
            return false;
        };
        set.insert(hook)
    }

    /// Removes one hook from the table, returning whether it was still
    /// registered. Used by per-thread teardown, which may run on a
    /// different thread than the one that installed the hook.
    pub fn take_hook(&self, hook: isize) -> bool {
        match self.hooks.lock() {
            Ok(mut set) => set.remove(&hook),
            Err(_) => false,
        }
    }

    /// Atomically takes every installed hook, leaving the table empty.
    pub fn drain_hooks(&self) -> Vec<isize> {
        match self.hooks.lock() {
            Ok(mut set) => set.drain().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Blocks until every in-flight callback has returned, polling at
    /// [`DRAIN_POLL_INTERVAL`].
    ///
    /// Must only be called from the dedicated teardown path — never
    /// from inside a message callback, where it would deadlock against
    /// the callback's own scope.
    pub fn wait_for_idle(&self) {
        while self.in_flight() > 0 {
            std::thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for the in-flight callback count.
pub struct CallScope<'a> {
    registry: &'a HookRegistry,
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        self.registry.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn reserve_is_idempotent() {
        let reg = HookRegistry::new();
        assert!(reg.reserve_subclass(0x100));
        assert!(!reg.reserve_subclass(0x100));
        reg.release_subclass(0x100);
        assert!(reg.reserve_subclass(0x100));
    }

    #[test]
    fn installs_refused_after_shutdown() {
        let reg = HookRegistry::new();
        assert!(reg.register_hook(1));
        reg.begin_shutdown();
        assert!(!reg.register_hook(2));
        assert!(!reg.reserve_subclass(0x200));
        assert_eq!(reg.drain_hooks(), vec![1]);
    }

    #[test]
    fn drain_takes_everything_once() {
        let reg = HookRegistry::new();
        for h in [0x10usize, 0x20, 0x30] {
            assert!(reg.reserve_subclass(h));
        }
        let mut drained = reg.drain_subclassed();
        drained.sort_unstable();
        assert_eq!(drained, vec![0x10, 0x20, 0x30]);
        assert!(reg.drain_subclassed().is_empty());
    }

    #[test]
    fn call_scope_balances_on_drop() {
        let reg = HookRegistry::new();
        {
            let _a = reg.enter();
            let _b = reg.enter();
            assert_eq!(reg.in_flight(), 2);
        }
        assert_eq!(reg.in_flight(), 0);
    }

    #[test]
    fn teardown_waits_for_concurrent_callbacks() {
        let reg = Arc::new(HookRegistry::new());
        let threads = 8;
        let ready = Arc::new(Barrier::new(threads + 1));

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let reg = Arc::clone(&reg);
                let ready = Arc::clone(&ready);
                thread::spawn(move || {
                    // Each "UI thread" has one window mid-drag and one
                    // callback in flight when shutdown begins.
                    assert!(reg.reserve_subclass(0x1000 + i));
                    let scope = reg.enter();
                    ready.wait();
                    thread::sleep(Duration::from_millis(30));
                    drop(scope);
                })
            })
            .collect();

        ready.wait();
        reg.begin_shutdown();

        let drained = reg.drain_subclassed();
        assert_eq!(drained.len(), threads);

        reg.wait_for_idle();
        assert_eq!(reg.in_flight(), 0);

        for h in handles {
            h.join().unwrap();
        }
    }

    // Models the shutdown path's synchronous detach: each "UI thread"
    // sits in its pump until the detach request arrives, releases its
    // subclass, and acknowledges. The teardown thread waits for that
    // acknowledgement per window, so by the time the loop finishes no
    // subclass is left installed anywhere.
    #[test]
    fn teardown_confirms_each_detach_before_returning() {
        use std::sync::mpsc;

        let reg = Arc::new(HookRegistry::new());
        let windows = 4;
        let mut pumps = Vec::new();
        let mut threads = Vec::new();

        for i in 0..windows {
            let handle = 0x2000 + i;
            assert!(reg.reserve_subclass(handle));

            let (pump_tx, pump_rx) = mpsc::channel::<mpsc::Sender<()>>();
            let reg = Arc::clone(&reg);
            threads.push(thread::spawn(move || {
                let ack = pump_rx.recv().unwrap();
                reg.release_subclass(handle);
                ack.send(()).unwrap();
            }));
            pumps.push((handle, pump_tx));
        }

        reg.begin_shutdown();
        let drained = reg.drain_subclassed();
        assert_eq!(drained.len(), windows);

        for (handle, pump) in pumps {
            assert!(drained.contains(&handle));
            let (ack_tx, ack_rx) = mpsc::channel();
            pump.send(ack_tx).unwrap();
            // Blocks until that window's thread has run its detach.
            ack_rx.recv().unwrap();
        }

        reg.wait_for_idle();
        assert!(reg.drain_subclassed().is_empty());

        for t in threads {
            t.join().unwrap();
        }
    }
}
