//! [`User`] definitions.

pub mod magic_link;
pub mod session;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contact;

pub use self::{magic_link::MagicLink, session::Session};

/// Platform user.
///
/// Identified by its [`contact::Email`] alone. A [`User`] is created
/// inactive and becomes active once the magic link sent to that address is
/// followed.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`contact::Email`] of this [`User`].
    pub email: contact::Email,

    /// [`DateTime`] when this [`User`] followed its magic link.
    ///
    /// [`None`] until the [`contact::Email`] is verified.
    pub activated_at: Option<ActivationDateTime>,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

impl User {
    /// Indicates whether this [`User`] has verified its
    /// [`contact::Email`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }
}

/// ID of a [`User`].
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

/// [`DateTime`] when a [`User`] verified its e-mail address.
pub type ActivationDateTime = DateTimeOf<(User, unit::Activation)>;

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;
