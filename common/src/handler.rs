//! [`Handler`] abstractions.

use std::future::Future;

/// Operation executable on some carrier type.
///
/// Commands, queries, database operations, background tasks and outgoing
/// mail all go through this single seam, so any of them may be swapped for
/// another implementation (or a test double) without touching the callers.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
