//! [`MoverBooking`] and transient [`Quote`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{booking, mover, user};
#[cfg(doc)]
use crate::domain::{Booking, MoverService, User};

/// Order of a relocation with a [`MoverService`].
#[derive(Clone, Debug)]
pub struct MoverBooking {
    /// ID of this [`MoverBooking`].
    pub id: Id,

    /// ID of the rental [`Booking`] this relocation is tied to, if any.
    pub booking_id: Option<booking::Id>,

    /// ID of the [`MoverService`] performing the relocation.
    ///
    /// [`None`] once the [`MoverService`] has been deleted: the order itself
    /// outlives it.
    pub mover_id: Option<mover::Id>,

    /// ID of the [`User`] who ordered the relocation.
    pub tenant_id: user::Id,

    /// Pickup address of the relocation.
    pub pickup: Address,

    /// Dropoff address of the relocation.
    pub dropoff: Address,

    /// [`Distance`] of the relocation, in kilometers.
    pub distance_km: Distance,

    /// Flat [`Money`] charged regardless of the [`Distance`].
    pub base_rate: Money,

    /// [`Money`] charged per kilometer.
    pub rate_per_km: Money,

    /// Total [`Money`] of the relocation.
    ///
    /// Always kept equal to [`quote_price()`] of the fields above.
    ///
    /// [`quote_price()`]: quote_price
    pub total_cost: Money,

    /// Average [`mover::Score`] of the [`MoverService`] at the moment of
    /// quoting.
    pub rating_snapshot: Decimal,

    /// Current [`Status`] of this [`MoverBooking`].
    pub status: Status,

    /// [`DateTime`] when this [`MoverBooking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`MoverBooking`] was updated the last time.
    pub updated_at: UpdateDateTime,
}

impl MoverBooking {
    /// Transitions this [`MoverBooking`] into the provided [`Status`].
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

    /// Recomputes the [`total_cost`] of this [`MoverBooking`] from its rates
    /// and [`Distance`].
    ///
    /// Returns [`None`] on a currency mismatch or an arithmetic overflow.
    ///
    /// [`total_cost`]: MoverBooking::total_cost
    #[must_use]
    pub fn recompute_total(&mut self) -> Option<()> {
        self.total_cost =
            quote_price(self.base_rate, self.rate_per_km, self.distance_km)?;
        Some(())
    }
}

/// Computes the price of a relocation:
/// `base_rate + rate_per_km × distance_km`.
///
/// Returns [`None`] on a currency mismatch or an arithmetic overflow.
#[must_use]
pub fn quote_price(
    base_rate: Money,
    rate_per_km: Money,
    distance_km: Distance,
) -> Option<Money> {
    base_rate.checked_add(rate_per_km.checked_mul(distance_km.into_inner())?)
}

/// ID of a [`MoverBooking`].
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
    #[doc = "Status of a [`MoverBooking`]."]
    enum Status {
        #[doc = "Waiting for the mover's decision."]
        Pending = 1,

        #[doc = "Accepted by the mover."]
        Confirmed = 2,

        #[doc = "Rejected by the mover."]
        Rejected = 3,

        #[doc = "Relocation has been performed."]
        Completed = 4,

        #[doc = "Cancelled by the tenant."]
        Cancelled = 5,
    }
}

impl Status {
    /// Indicates whether the transition from this [`Status`] into the
    /// provided one is legal.
    ///
    /// The single source of truth for the [`MoverBooking`] state machine:
    /// `pending → confirmed | rejected | cancelled`,
    /// `confirmed → completed | cancelled`; the rest are terminal.
    #[must_use]
    pub fn allows(self, to: Self) -> bool {
        match self {
            Self::Pending => {
                matches!(to, Self::Confirmed | Self::Rejected | Self::Cancelled)
            }
            Self::Confirmed => matches!(to, Self::Completed | Self::Cancelled),
            Self::Rejected | Self::Completed | Self::Cancelled => false,
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
#[display("illegal `MoverBooking` transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted into.
    pub to: Status,
}

/// Pickup or dropoff address of a [`MoverBooking`].
#[derive(
    Clone, Debug, derive_more::AsRef, Display, Eq, Hash, PartialEq,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.len() <= 500).then_some(Self(text))
    }
}

impl std::str::FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Distance of a relocation, in kilometers.
///
/// Always strictly positive.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Into, PartialEq, Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Distance(Decimal);

impl Distance {
    /// Creates a new [`Distance`] if the given `km` value is strictly
    /// positive.
    #[must_use]
    pub fn new(km: Decimal) -> Option<Self> {
        (km > Decimal::ZERO).then_some(Self(km))
    }

    /// Returns the underlying [`Decimal`] kilometers.
    #[must_use]
    pub const fn into_inner(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Distance {
    type Error = &'static str;

    fn try_from(km: Decimal) -> Result<Self, Self::Error> {
        Self::new(km).ok_or("`Distance` must be positive")
    }
}

impl std::str::FromStr for Distance {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map_err(|_| "invalid `Distance`")
            .and_then(Self::try_from)
    }
}

/// Transient quotation of a [`MoverBooking`].
///
/// Lives only in memory, scoped to the [`User`] it was issued to, and
/// expires after a configured period. Confirming it consumes it and
/// persists the resulting [`MoverBooking`].
#[derive(Clone, Debug)]
pub struct Quote {
    /// ID of this [`Quote`].
    pub id: QuoteId,

    /// ID of the rental [`Booking`] the relocation is tied to, if any.
    pub booking_id: Option<booking::Id>,

    /// ID of the quoted [`MoverService`].
    pub mover_id: mover::Id,

    /// Pickup address of the relocation.
    pub pickup: Address,

    /// Dropoff address of the relocation.
    pub dropoff: Address,

    /// [`Distance`] of the relocation, in kilometers.
    pub distance_km: Distance,

    /// Flat [`Money`] charged regardless of the [`Distance`].
    pub base_rate: Money,

    /// [`Money`] charged per kilometer.
    pub rate_per_km: Money,

    /// Total [`Money`] of the relocation.
    pub total_cost: Money,

    /// Average [`mover::Score`] of the [`MoverService`] at the moment of
    /// quoting.
    pub rating_snapshot: Decimal,

    /// [`DateTime`] when this [`Quote`] was issued.
    pub quoted_at: QuotationDateTime,
}

/// ID of a [`Quote`].
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
pub struct QuoteId(Uuid);

impl QuoteId {
    /// Creates a new random [`QuoteId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`MoverBooking`] was created.
pub type CreationDateTime = DateTimeOf<(MoverBooking, unit::Creation)>;

/// [`DateTime`] when a [`MoverBooking`] was updated the last time.
pub type UpdateDateTime = DateTimeOf<(MoverBooking, unit::Update)>;

/// [`DateTime`] when a [`Quote`] was issued.
pub type QuotationDateTime = DateTimeOf<(Quote, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use super::{quote_price, Distance, Status};

    fn kes(amount: i64) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Kes,
        }
    }

    #[test]
    fn transition_table() {
        use Status as S;

        let legal = [
            (S::Pending, S::Confirmed),
            (S::Pending, S::Rejected),
            (S::Pending, S::Cancelled),
            (S::Confirmed, S::Completed),
            (S::Confirmed, S::Cancelled),
        ];

        let all =
            [S::Pending, S::Confirmed, S::Rejected, S::Completed, S::Cancelled];
        for from in all {
            for to in all {
                assert_eq!(
                    from.allows(to),
                    legal.contains(&(from, to)),
                    "{from} -> {to}",
                );
            }
        }
    }

    #[test]
    fn distance_must_be_positive() {
        assert!(Distance::new(Decimal::ZERO).is_none());
        assert!(Distance::new(Decimal::NEGATIVE_ONE).is_none());
        assert!(Distance::new(Decimal::new(105, 1)).is_some());
    }

    #[test]
    fn price_is_base_plus_distance_times_rate() {
        let dist = Distance::new(10.into()).unwrap();

        assert_eq!(quote_price(kes(1000), kes(50), dist), Some(kes(1500)));
    }
}
