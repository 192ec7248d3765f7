//! [`ExpireStaleQuotes`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start};
use tokio::time::interval;
use tracing as log;

#[cfg(doc)]
use crate::domain::Quote;
use crate::Service;

use super::Task;

/// Configuration for [`ExpireStaleQuotes`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between purges of expired [`Quote`]s.
    pub interval: time::Duration,
}

/// [`Task`] for purging expired [`Quote`]s out of the in-memory store.
///
/// A [`Quote`] is unreachable the moment its TTL elapses, this [`Task`] only
/// reclaims the memory it occupies.
#[derive(Clone, Debug)]
pub struct ExpireStaleQuotes<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, M> Task<Start<By<ExpireStaleQuotes<Self>, Config>>>
    for Service<Db, M>
where
    ExpireStaleQuotes<Service<Db, M>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireStaleQuotes<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpireStaleQuotes {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::ExpireStaleQuotes` failed: {e}");
            });
        }
    }
}

impl<Db, M> Task<Perform<()>> for ExpireStaleQuotes<Service<Db, M>> {
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let purged = self.service.quotes().purge_expired().await;
        if purged > 0 {
            log::debug!("purged {purged} expired `Quote`s");
        }
        Ok(())
    }
}
