//! [`Query`] collection related to multiple [`House`]s.

use common::operations::By;

use crate::{domain::House, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`House`]s.
pub type List = DatabaseQuery<By<Vec<House>, read::house::Filter>>;

/// Queries the most recently listed [`House`]s.
pub type Recent = DatabaseQuery<By<Vec<House>, read::house::RecentLimit>>;

/// Queries the per-category counts of listed [`House`]s.
pub type Stats = DatabaseQuery<By<read::house::Stats, ()>>;
