//! Magic-link verification definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::domain::{contact, user};
#[cfg(doc)]
use crate::domain::User;

/// Claims carried by a magic-link [`Token`].
///
/// Sent to a freshly registered [`User`] by e-mail. Following the link and
/// presenting the [`Token`] back activates the [`User`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MagicLink {
    /// ID of the [`User`] to activate.
    pub user_id: user::Id,

    /// [`contact::Email`] the link was sent to.
    pub email: contact::Email,

    /// [`DateTime`] when this [`MagicLink`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Signed token of a [`MagicLink`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`DateTime`] of a [`MagicLink`] expiration.
pub type ExpirationDateTime = DateTimeOf<(MagicLink, unit::Expiration)>;
