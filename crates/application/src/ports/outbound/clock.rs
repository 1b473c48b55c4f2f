//! Clock port - Interface for time operations.

/// Port for getting the current time.
///
/// All life-cycle decisions (expiry, retention cutoffs) go through this
/// port so tests can pin or advance time.
pub trait Clock: Send + Sync {
    /// Get the current Unix timestamp in seconds.
    fn now(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}
