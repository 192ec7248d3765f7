//! [`Query`] collection related to multiple [`Booking`]s.

use common::operations::By;

use crate::{
    domain::{user, Booking},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`Booking`]s.
pub type List = DatabaseQuery<By<Vec<Booking>, read::booking::Filter>>;

/// Queries the per-status [`Booking`] counts of a tenant.
pub type StatusCounts =
    DatabaseQuery<By<read::booking::StatusCounts, user::Id>>;
