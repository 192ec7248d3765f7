//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;
#[cfg(test)]
mod testing;

use std::time::Duration;

use common::{
    operations::{By, Start},
    Money,
};
use derive_more::{Debug, Display, Error};

#[cfg(doc)]
use domain::Quote;
#[cfg(doc)]
use infra::Database;
use infra::Quotes;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Marketplace-wide base rate of a relocation.
    pub moving_base_rate: Money,

    /// Marketplace-wide rate per kilometre of a relocation.
    pub moving_rate_per_km: Money,

    /// [`Duration`] an unconfirmed [`Quote`] stays valid for.
    pub quote_ttl: Duration,

    /// [`task::ExpireStaleQuotes`] configuration.
    pub expire_stale_quotes: task::expire_stale_quotes::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, M> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`infra::Mailer`] of this [`Service`].
    mailer: M,

    /// In-memory store of unconfirmed [`Quote`]s.
    quotes: Quotes,
}

impl<Db, M> Service<Db, M> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        mailer: M,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ExpireStaleQuotes<Self>,
                        task::expire_stale_quotes::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let quotes = Quotes::new(config.quote_ttl);
        let this = Service {
            config,
            database,
            mailer,
            quotes,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().expire_stale_quotes)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`infra::Mailer`] of this [`Service`].
    #[must_use]
    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Returns the [`Quotes`] store of this [`Service`].
    #[must_use]
    pub fn quotes(&self) -> &Quotes {
        &self.quotes
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<
                task::ExpireStaleQuotes<Svc>,
                task::expire_stale_quotes::Config,
            >,
        >,
    >,
{
    /// [`task::ExpireStaleQuotes`] failed to start.
    ExpireStaleQuotesTask(
        TaskStartError<
            Svc,
            task::ExpireStaleQuotes<Svc>,
            task::expire_stale_quotes::Config,
        >,
    ),
}
