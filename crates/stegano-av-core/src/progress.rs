//! Per call progress reporting and cooperative cancellation.
//!
//! Nothing in here is global: every encode or decode call carries its own
//! [`Progress`], so concurrent calls never observe each other.

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::result::Result;
use crate::SteganoError;

/// Callback receiving `(done, total)`; must return quickly.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A flag that can be raised from another thread to stop a running call
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Default, Clone)]
pub struct Progress {
    callback: Option<ProgressCallback>,
    cancel: Option<CancelFlag>,
}

impl Debug for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("callback", &self.callback.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn report(&self, done: u64, total: u64) {
        if let Some(cb) = &self.callback {
            cb(done, total);
        }
    }

    /// Errors with [`SteganoError::Cancelled`] once the cancel flag was raised.
    pub fn checkpoint(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(SteganoError::Cancelled),
            _ => Ok(()),
        }
    }
}
