//! Per-container error-handling configuration.
//!
//! Every container carries a [`Config`] chosen at construction. There is no
//! process-wide state: two containers in the same program may report errors
//! differently.

use crate::error::Error;

/// What a container does when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorPolicy {
    /// Emit a `tracing` warning, then return the error.
    #[cfg_attr(not(feature = "abort-on-error"), default)]
    Report,
    /// Return the error without logging.
    Quiet,
    /// Panic with the error. Meant for small programs that do not handle errors.
    #[cfg_attr(feature = "abort-on-error", default)]
    Abort,
}

/// Construction-time settings for a stack or queue.
///
/// # Example
/// ```
/// use ringstack::{Config, ErrorPolicy, TypedQueue};
///
/// let mut q: TypedQueue<u32> = TypedQueue::with_config(4, Config::quiet()).unwrap();
/// assert!(q.pop().is_err()); // reported silently
/// assert_eq!(q.config().policy, ErrorPolicy::Quiet);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Config {
    /// How failures are surfaced.
    pub policy: ErrorPolicy,
}

impl Config {
    /// Creates a configuration with the given policy.
    pub const fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    /// Errors are returned without logging.
    pub const fn quiet() -> Self {
        Self::new(ErrorPolicy::Quiet)
    }

    /// Errors are logged through `tracing` and returned.
    pub const fn report() -> Self {
        Self::new(ErrorPolicy::Report)
    }

    /// Errors panic.
    pub const fn abort() -> Self {
        Self::new(ErrorPolicy::Abort)
    }

    /// Returns a copy with the policy replaced.
    pub const fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies the policy to `err` and hands it back for propagation.
    ///
    /// # Panics
    /// Panics when the policy is [`ErrorPolicy::Abort`].
    #[inline(never)]
    #[track_caller]
    pub fn raise(&self, err: Error) -> Error {
        match self.policy {
            ErrorPolicy::Report => {
                tracing::warn!(error = %err, "container operation failed");
                err
            }
            ErrorPolicy::Quiet => err,
            ErrorPolicy::Abort => panic!("container operation failed: {err}"),
        }
    }

    /// Shorthand for `Err(self.raise(err))`.
    #[inline(always)]
    #[track_caller]
    pub(crate) fn fail<T>(&self, err: Error) -> crate::Result<T> {
        Err(self.raise(err))
    }
}
