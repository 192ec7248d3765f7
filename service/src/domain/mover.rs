//! [`Service`] and [`Rating`] definitions of the movers marketplace.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contact, user};
#[cfg(doc)]
use crate::domain::User;

/// Moving company offering relocation services.
#[derive(Clone, Debug)]
pub struct Service {
    /// ID of this [`Service`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Service`].
    pub owner_id: user::Id,

    /// Name of this [`Service`].
    pub name: Name,

    /// Description of this [`Service`].
    pub description: Description,

    /// [`Money`] charged per kilometer of a move.
    pub rate_per_km: Money,

    /// Indicator whether this [`Service`] also provides cleaning.
    pub provides_cleaning: bool,

    /// [`contact::Phone`] of this [`Service`].
    pub contact_phone: contact::Phone,

    /// [`contact::Email`] of this [`Service`], if any.
    pub contact_email: Option<contact::Email>,

    /// [`DateTime`] when this [`Service`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Service`] was updated the last time.
    pub updated_at: UpdateDateTime,
}

/// ID of a [`Service`].
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

/// Name of a [`Service`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (name.trim() == name && !name.is_empty() && name.len() <= 200)
            .then_some(Self(name))
    }
}

impl std::str::FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Description of a [`Service`].
///
/// May be empty.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.len() <= 5000).then_some(Self(text))
    }
}

impl std::str::FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Review left by a [`User`] for a [`Service`].
///
/// A [`User`] holds at most one [`Rating`] per [`Service`]: submitting again
/// replaces the previous one.
#[derive(Clone, Debug)]
pub struct Rating {
    /// ID of this [`Rating`].
    pub id: RatingId,

    /// ID of the [`Service`] this [`Rating`] is of.
    pub service_id: Id,

    /// ID of the [`User`] who left this [`Rating`].
    pub user_id: user::Id,

    /// [`Score`] of this [`Rating`].
    pub score: Score,

    /// Optional [`Comment`] accompanying the [`Score`].
    pub comment: Option<Comment>,

    /// [`DateTime`] when this [`Rating`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rating`] was updated the last time.
    pub updated_at: UpdateDateTime,
}

/// ID of a [`Rating`].
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
pub struct RatingId(Uuid);

impl RatingId {
    /// Creates a new random [`RatingId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Score of a [`Rating`], from 1 to 5 stars inclusive.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Into, PartialEq, Serialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Minimum possible [`Score`].
    pub const MIN: Self = Self(1);

    /// Maximum possible [`Score`].
    pub const MAX: Self = Self(5);

    /// Creates a new [`Score`] if the given `stars` are within bounds.
    #[must_use]
    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&stars)
            .then_some(Self(stars))
    }

    /// Converts this [`Score`] into its [`u8`] representation.
    #[must_use]
    pub const fn u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = &'static str;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars).ok_or("`Score` out of 1..=5 bounds")
    }
}

#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for Score {
    postgres_types::accepts!(INT2);

    fn from_sql(
        ty: &postgres_types::Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Self::new(u8::try_from(i16::from_sql(ty, raw)?)?)
            .ok_or_else(|| "`Score` out of 1..=5 bounds".into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Score {
    postgres_types::accepts!(INT2);

    postgres_types::to_sql_checked!();

    fn to_sql(
        &self,
        ty: &postgres_types::Type,
        w: &mut postgres_types::private::BytesMut,
    ) -> Result<
        postgres_types::IsNull,
        Box<dyn std::error::Error + Sync + Send>,
    > {
        i16::from(self.0).to_sql(ty, w)
    }
}

/// Comment accompanying a [`Rating`]'s [`Score`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.len() <= 2000).then_some(Self(text))
    }
}

impl std::str::FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// [`DateTime`] when a [`Service`] or a [`Rating`] was created.
pub type CreationDateTime = DateTimeOf<(Service, unit::Creation)>;

/// [`DateTime`] when a [`Service`] or a [`Rating`] was updated the last time.
pub type UpdateDateTime = DateTimeOf<(Service, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::Score;

    #[test]
    fn score_is_bounded() {
        assert!(Score::new(0).is_none());
        assert!(Score::new(6).is_none());
        for stars in 1..=5 {
            assert_eq!(Score::new(stars).map(Score::u8), Some(stars));
        }
    }
}
