//! [`Query`] collection related to a single [`MoverService`].

use common::operations::By;

use crate::{
    domain::{mover, MoverRating, MoverService},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`MoverService`] by its [`mover::Id`].
pub type ById = DatabaseQuery<By<Option<MoverService>, mover::Id>>;

/// Queries the [`MoverRating`]s of a [`MoverService`].
pub type Ratings = DatabaseQuery<By<Vec<MoverRating>, mover::Id>>;

/// Queries the aggregate rating of a [`MoverService`].
pub type RatingSummary =
    DatabaseQuery<By<read::mover::RatingSummary, mover::Id>>;
