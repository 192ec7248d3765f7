//! [`MoverService`] read model definitions.
//!
//! [`MoverService`]: crate::domain::MoverService

use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::{mover, MoverRating, MoverService};
use crate::domain::user;

/// Filter of a [`MoverService`] listing.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Select only [`MoverService`]s owned by this [`user::Id`].
    pub owner_id: Option<user::Id>,

    /// Substring to search for in the [`mover::Name`] or
    /// [`mover::Description`].
    pub query: Option<String>,

    /// Select only [`MoverService`]s that also provide cleaning.
    pub provides_cleaning: Option<bool>,
}

/// Aggregate over the [`MoverRating`]s of a single [`MoverService`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RatingSummary {
    /// Average [`mover::Score`], rounded to 1 decimal place.
    ///
    /// Zero when no [`MoverRating`]s exist.
    pub average: Decimal,

    /// Number of [`MoverRating`]s aggregated.
    pub count: i64,
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self {
            average: Decimal::ZERO,
            count: 0,
        }
    }
}
