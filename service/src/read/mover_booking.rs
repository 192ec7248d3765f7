//! [`MoverBooking`] read model definitions.
//!
//! [`MoverBooking`]: crate::domain::MoverBooking

use crate::domain::{mover, user};
#[cfg(doc)]
use crate::domain::{MoverBooking, MoverService};

/// Filter of a [`MoverBooking`] listing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    /// Select only [`MoverBooking`]s ordered by this tenant.
    pub tenant_id: Option<user::Id>,

    /// Select only [`MoverBooking`]s of [`MoverService`]s owned by this
    /// [`user::Id`].
    pub owner_id: Option<user::Id>,

    /// Select only [`MoverBooking`]s of this [`MoverService`].
    pub mover_id: Option<mover::Id>,
}
