//! [`Command`] for registering a new [`User`].

use std::time::Duration;

use common::{
    operations::{By, Delete, Dispatch, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contact,
        user::{self, magic_link, MagicLink},
        User,
    },
    infra::{database, mailer, Database, Mailer},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`User`].
///
/// The created [`User`] is inactive until the magic link sent to the
/// provided e-mail is followed.
///
/// Registering an already taken e-mail reports success without touching
/// anything, so the existence of an account cannot be probed.
#[derive(Clone, Debug, From)]
pub struct CreateUser {
    /// [`contact::Email`] to register the [`User`] with.
    pub email: contact::Email,
}

impl CreateUser {
    /// [`Duration`] a [`MagicLink`] stays valid for.
    const MAGIC_LINK_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
}

impl<Db, M> Command<CreateUser> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, contact::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Delete<By<User, user::Id>>, Err = Traced<database::Error>>,
    M: Mailer<
        Dispatch<mailer::Message>,
        Ok = (),
        Err = Traced<mailer::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser { email } = cmd;

        if self
            .database()
            .execute(Select(By::<Option<User>, _>::new(email.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            // Same answer as for a fresh e-mail.
            return Ok(());
        }

        let user = User {
            id: user::Id::new(),
            email: email.clone(),
            activated_at: None,
            created_at: DateTime::now().coerce(),
        };
        if let Err(e) = self.database().execute(Insert(user.clone())).await {
            return if e.as_ref().is_unique_violation(Some("users_email_key")) {
                // Lost the race to a concurrent registration, which is
                // still not worth reporting.
                Ok(())
            } else {
                Err(tracerr::map_from_and_wrap!(=> E)(e))
            };
        }

        let expires_at =
            (DateTime::now() + CreateUser::MAGIC_LINK_DURATION).coerce();
        let token = jsonwebtoken::encode::<MagicLink>(
            &jsonwebtoken::Header::default(),
            &MagicLink {
                user_id: user.id,
                email: email.clone(),
                expires_at,
            },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `magic_link::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { magic_link::Token::new_unchecked(token) };

        let message = mailer::Message {
            to: email,
            subject: "Verify your e-mail".into(),
            body: format!(
                "Follow the link to activate your account: \
                 /verify-email?token={token}",
            ),
        };
        if let Err(e) = self.mailer().execute(Dispatch(message)).await {
            // An unreachable inbox must not leave a half-registered account
            // behind, so the registration is undone.
            self.database()
                .execute(Delete(By::<User, _>::new(user.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
        }

        Ok(())
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`Mailer`] error.
    #[display("Failed to dispatch the magic-link e-mail: {_0}")]
    Mail(mailer::Error),
}

#[cfg(test)]
mod spec {
    use crate::{domain::contact, infra::mailer, testing};

    use super::{Command as _, CreateUser, ExecutionError};

    #[tokio::test]
    async fn registers_an_inactive_user() {
        let svc = testing::service(mailer::Log);
        let email = contact::Email::new("new@example.com").unwrap();

        svc.execute(CreateUser {
            email: email.clone(),
        })
        .await
        .unwrap();

        let users = svc.database.users.lock().unwrap();
        let user = users.values().find(|u| u.email == email).unwrap();
        assert!(!user.is_active());
    }

    #[tokio::test]
    async fn answers_neutrally_on_a_taken_email() {
        let svc = testing::service(mailer::Log);
        let existing = testing::user(&svc, "taken@example.com");

        svc.execute(CreateUser {
            email: existing.email.clone(),
        })
        .await
        .unwrap();

        let users = svc.database.users.lock().unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[&existing.id].is_active());
    }

    #[tokio::test]
    async fn rolls_back_on_a_failed_dispatch() {
        let svc = testing::service(testing::RejectingMailer);
        let email = contact::Email::new("new@example.com").unwrap();

        let err = svc
            .execute(CreateUser {
                email: email.clone(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Mail(_)));
        assert!(svc.database.users.lock().unwrap().is_empty());
    }
}
