//! [`Query`] collection related to multiple [`MoverService`]s.

use common::operations::By;

use crate::{domain::MoverService, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`MoverService`]s.
pub type List = DatabaseQuery<By<Vec<MoverService>, read::mover::Filter>>;
