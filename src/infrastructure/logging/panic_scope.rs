//! Guarded scopes that turn panics into values.
//!
//! A process-wide panic hook is installed on first use. While the current
//! thread is inside a guarded scope the hook records the payload, location
//! and a backtrace into a thread-local slot and prints nothing; outside any
//! scope it defers to whatever hook was installed before.

use chrono::{DateTime, Local};
use futures::FutureExt;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

use crate::domain::models::crash::{payload_text, CrashReport};

thread_local! {
    static SCOPE_DEPTH: Cell<u32> = const { Cell::new(0) };
    static CAPTURED: RefCell<Option<CapturedPanic>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// A panic caught inside a guarded scope.
#[derive(Debug, Clone)]
pub struct CapturedPanic {
    pub value: String,
    pub location: Option<String>,
    pub backtrace: String,
}

impl CapturedPanic {
    fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        Self {
            value: payload_text(payload),
            location: None,
            backtrace: Backtrace::force_capture().to_string(),
        }
    }

    pub fn into_report(self, timestamp: DateTime<Local>) -> CrashReport {
        CrashReport {
            value: self.value,
            location: self.location,
            backtrace: self.backtrace,
            timestamp,
        }
    }
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !in_scope() {
                previous(info);
                return;
            }
            let captured = CapturedPanic {
                value: payload_text(info.payload()),
                location: info
                    .location()
                    .map(|loc| format!("{}:{}", loc.file(), loc.line())),
                backtrace: Backtrace::force_capture().to_string(),
            };
            CAPTURED.with(|slot| *slot.borrow_mut() = Some(captured));
        }));
    });
}

/// Marks the current thread as inside a guarded scope until dropped.
struct ScopeGuard;

impl ScopeGuard {
    fn enter() -> Self {
        install_hook();
        SCOPE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn take_captured(payload: &(dyn std::any::Any + Send)) -> CapturedPanic {
    CAPTURED
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| CapturedPanic::from_payload(payload))
}

/// Whether the current thread is inside a guarded scope.
pub fn in_scope() -> bool {
    SCOPE_DEPTH.with(Cell::get) > 0
}

/// Run `f`, converting a panic into [`CapturedPanic`].
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, CapturedPanic> {
    let scope = ScopeGuard::enter();
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    drop(scope);
    result.map_err(|payload| take_captured(payload.as_ref()))
}

/// Polls the inner future with the scope marker set, so panics on any
/// worker thread are captured by that thread's slot.
struct Scoped<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> Future for Scoped<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _scope = ScopeGuard::enter();
        self.inner.as_mut().poll(cx)
    }
}

/// Async counterpart of [`catch`].
pub async fn catch_async<F: Future>(future: F) -> Result<F::Output, CapturedPanic> {
    let scoped = Scoped {
        inner: Box::pin(future),
    };
    AssertUnwindSafe(scoped)
        .catch_unwind()
        .await
        .map_err(|payload| take_captured(payload.as_ref()))
}
