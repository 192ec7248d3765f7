//! [`Booking`] read model definitions.
//!
//! [`Booking`]: crate::domain::Booking

use crate::domain::{house, user};
#[cfg(doc)]
use crate::domain::{Booking, House, User};

/// Filter of a [`Booking`] listing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    /// Select only [`Booking`]s placed by this tenant.
    pub tenant_id: Option<user::Id>,

    /// Select only [`Booking`]s on [`House`]s of this landlord.
    pub landlord_id: Option<user::Id>,

    /// Select only [`Booking`]s of this [`House`].
    pub house_id: Option<house::Id>,
}

/// Counts of a [`User`]'s [`Booking`]s per status, for the dashboard.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatusCounts {
    /// Number of pending [`Booking`]s.
    pub pending: i64,

    /// Number of approved [`Booking`]s.
    pub approved: i64,

    /// Number of rejected [`Booking`]s.
    pub rejected: i64,

    /// Number of cancelled [`Booking`]s.
    pub cancelled: i64,
}
