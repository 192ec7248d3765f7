//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contact, house, user};
#[cfg(doc)]
use crate::domain::{House, User};

/// Request of a tenant to rent a unit of a [`House`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the [`User`] who placed this [`Booking`].
    pub tenant_id: user::Id,

    /// ID of the [`House`] this [`Booking`] is for.
    pub house_id: house::Id,

    /// [`DateTime`] the tenant intends to move in.
    pub move_in_at: MoveInDateTime,

    /// Lease duration in months.
    pub lease_months: LeaseMonths,

    /// Name of the tenant, snapshotted at creation time.
    pub tenant_name: TenantName,

    /// [`contact::Phone`] of the tenant, snapshotted at creation time.
    pub tenant_phone: contact::Phone,

    /// [`contact::Email`] of the tenant, snapshotted at creation time.
    pub tenant_email: contact::Email,

    /// [`Message`] of the tenant to the landlord.
    pub message: Message,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was updated the last time.
    pub updated_at: UpdateDateTime,
}

impl Booking {
    /// Transitions this [`Booking`] into the provided [`Status`].
    ///
    /// # Errors
    ///
    /// Errors if the transition is not listed in the [`Status`] transition
    /// table.
    pub fn transition(&mut self, to: Status) -> Result<(), InvalidTransition> {
        self.status = self.status.transition(to)?;
        self.updated_at = DateTimeOf::now();
        Ok(())
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Waiting for the landlord's decision."]
        Pending = 1,

        #[doc = "Approved by the landlord."]
        Approved = 2,

        #[doc = "Rejected by the landlord."]
        Rejected = 3,

        #[doc = "Cancelled by the tenant."]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether the transition from this [`Status`] into the
    /// provided one is legal.
    ///
    /// The single source of truth for the [`Booking`] state machine:
    /// `pending → approved | rejected | cancelled`,
    /// `approved → cancelled`; `rejected` and `cancelled` are terminal.
    #[must_use]
    pub fn allows(self, to: Self) -> bool {
        match self {
            Self::Pending => {
                matches!(to, Self::Approved | Self::Rejected | Self::Cancelled)
            }
            Self::Approved => matches!(to, Self::Cancelled),
            Self::Rejected | Self::Cancelled => false,
        }
    }

    /// Transitions this [`Status`] into the provided one.
    ///
    /// # Errors
    ///
    /// Errors if the transition is not legal.
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        self.allows(to)
            .then_some(to)
            .ok_or(InvalidTransition { from: self, to })
    }
}

/// Error of an illegal [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("illegal `Booking` transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted into.
    pub to: Status,
}

/// Lease duration of a [`Booking`], in months.
pub type LeaseMonths = u16;

/// Name of a tenant, as entered on the [`Booking`] form.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct TenantName(String);

impl TenantName {
    /// Creates a new [`TenantName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (name.trim() == name && !name.is_empty() && name.len() <= 200)
            .then_some(Self(name))
    }
}

impl std::str::FromStr for TenantName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `TenantName`")
    }
}

/// Message of a tenant to the landlord.
///
/// May be empty.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.len() <= 2000).then_some(Self(text))
    }
}

impl std::str::FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// [`DateTime`] a tenant intends to move in.
pub type MoveInDateTime = DateTimeOf<(Booking, unit::MoveIn)>;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was updated the last time.
pub type UpdateDateTime = DateTimeOf<(Booking, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn transition_table() {
        use Status as S;

        let legal = [
            (S::Pending, S::Approved),
            (S::Pending, S::Rejected),
            (S::Pending, S::Cancelled),
            (S::Approved, S::Cancelled),
        ];

        for from in [S::Pending, S::Approved, S::Rejected, S::Cancelled] {
            for to in [S::Pending, S::Approved, S::Rejected, S::Cancelled] {
                assert_eq!(
                    from.allows(to),
                    legal.contains(&(from, to)),
                    "{from} -> {to}",
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        assert!(Status::Rejected.transition(Status::Approved).is_err());
        assert!(Status::Cancelled.transition(Status::Pending).is_err());
        assert!(Status::Approved.transition(Status::Approved).is_err());
    }
}
