//! [`Query`] collection related to a single [`MoverBooking`].

use common::operations::By;

use crate::domain::{mover_booking, MoverBooking};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`MoverBooking`] by its [`mover_booking::Id`].
pub type ById = DatabaseQuery<By<Option<MoverBooking>, mover_booking::Id>>;
