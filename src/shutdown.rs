//! Cancellation shared between the signal handler and the poll loop.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[cfg(unix)]
pub use self::signals::{SHUTDOWN_SIGNALS, forward_signals};

/// Clonable cancellation flag with an interruptible timed wait.
///
/// All clones share the same state; cancelling any of them wakes every
/// thread blocked in [`wait_timeout`](Self::wait_timeout).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    /// Flag plus the condition variable used to wake waiters
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        condvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `timeout`, returning early if cancelled.
    ///
    /// Returns `true` if the token is cancelled when the wait ends.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = flag.lock().unwrap_or_else(PoisonError::into_inner);

        while !*cancelled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            cancelled = condvar
                .wait_timeout(cancelled, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        *cancelled
    }
}

#[cfg(unix)]
mod signals {
    use super::CancellationToken;
    use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Signals;
    use signal_hook::low_level::signal_name;
    use std::ffi::c_int;
    use std::io;
    use std::thread::{self, JoinHandle};
    use tracing::warn;

    /// Signals that stop the poll loop.
    pub const SHUTDOWN_SIGNALS: [c_int; 3] = [SIGINT, SIGTERM, SIGQUIT];

    /// Cancel `token` when the first of [`SHUTDOWN_SIGNALS`] arrives.
    ///
    /// The handlers are installed before this returns; delivery is handled
    /// on a background thread that logs the signal name and exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the handlers cannot be registered.
    pub fn forward_signals(token: CancellationToken) -> io::Result<JoinHandle<()>> {
        let mut signals = Signals::new(SHUTDOWN_SIGNALS)?;

        thread::Builder::new()
            .name("dirwatch-signals".to_string())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    warn!(
                        signal = signal_name(signal).unwrap_or("unknown"),
                        "Received signal"
                    );
                    token.cancel();
                }
            })
    }
}
