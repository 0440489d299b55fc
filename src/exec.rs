use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs `f`, containing any panic so one failing callback cannot take down
/// the dispatch thread or the tasks queued behind it.
///
/// The panic payload is logged and dropped.
pub(crate) fn run_isolated<F: FnOnce()>(f: F) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "non-string panic payload"
        };
        tracing::error!("expiry callback panicked: {}", msg);
    }
}
