//! Outgoing mail implementations.

use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use common::operations::Dispatch;

use crate::domain::contact;

/// Mailing operation.
pub use common::Handler as Mailer;

/// E-mail message to be dispatched through a [`Mailer`].
#[derive(Clone, Debug)]
pub struct Message {
    /// [`contact::Email`] to dispatch this [`Message`] to.
    pub to: contact::Email,

    /// Subject line of this [`Message`].
    pub subject: String,

    /// Plain-text body of this [`Message`].
    pub body: String,
}

/// [`Mailer`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Transport refused to accept the [`Message`].
    #[display("`Message` was not accepted for delivery")]
    Rejected,
}

/// [`Mailer`] writing every [`Message`] to the log instead of delivering it.
///
/// Stands in for a real SMTP transport in development and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Log;

impl Mailer<Dispatch<Message>> for Log {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Dispatch(message): Dispatch<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        let Message { to, subject, body } = message;
        tracing::info!(to = %to, subject, body, "dispatching e-mail");
        Ok(())
    }
}
