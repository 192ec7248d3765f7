//! [`House`] read model definitions.
//!
//! [`House`]: crate::domain::House

use derive_more::{From, Into};

use crate::domain::{house, user};
#[cfg(doc)]
use crate::domain::House;

/// Filter of a [`House`] listing.
///
/// All the fields are combined with `AND`; a [`Default`] filter selects
/// every [`House`].
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Select only [`House`]s of this landlord.
    pub landlord_id: Option<user::Id>,

    /// Select only [`House`]s of this [`house::Category`].
    pub category: Option<house::Category>,

    /// Substring to search for in the [`house::Location`].
    pub location: Option<String>,

    /// Select only [`House`]s with at least one vacant unit.
    pub only_available: bool,
}

/// Number of most recently listed [`House`]s to show on the landing page.
#[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq)]
pub struct RecentLimit(i32);

impl Default for RecentLimit {
    fn default() -> Self {
        Self(10)
    }
}

/// Counts of [`House`]s per [`house::Category`], for the landing page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of listed [`House`]s.
    pub total: i64,

    /// Number of [`house::Category::Standalone`] [`House`]s.
    pub standalone: i64,

    /// Number of [`house::Category::Hostel`] [`House`]s.
    pub hostels: i64,

    /// Number of [`house::Category::Apartment`] [`House`]s.
    pub apartments: i64,

    /// Number of [`house::Category::Roommate`] [`House`]s.
    pub roommates: i64,
}
