//! [`Query`] collection related to multiple [`MoverBooking`]s.

use common::operations::By;

use crate::{domain::MoverBooking, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`MoverBooking`]s.
pub type List =
    DatabaseQuery<By<Vec<MoverBooking>, read::mover_booking::Filter>>;
