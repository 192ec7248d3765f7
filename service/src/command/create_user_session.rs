//! [`Command`] for creating a [`Session`].

use std::time::Duration;

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::session::Token;
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] of the [`User`] with the provided
/// ID.
///
/// Inactive [`User`]s cannot be signed in.
#[derive(Clone, Copy, Debug, From)]
pub struct CreateUserSession {
    /// ID of the [`User`] to create the [`Session`] for.
    pub user_id: user::Id,
}

impl CreateUserSession {
    /// [`Duration`] of [`Session`] expiration.
    const EXPIRATION_DURATION: Duration = Duration::from_secs(30 * 60);
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db, M> Command<CreateUserSession> for Service<Db, M>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateUserSession as Cmd;
        use ExecutionError as E;

        let Cmd { user_id } = cmd;

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if !user.is_active() {
            return Err(tracerr::new!(E::UserNotActivated(user_id)));
        }

        let expires_at = (DateTime::now() + Cmd::EXPIRATION_DURATION).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                expires_at,
            },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] with the provided ID has not verified their e-mail yet.
    #[display("`User(id: {_0})` is not activated")]
    #[from(ignore)]
    UserNotActivated(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{domain::user, infra::mailer, testing};

    use super::{Command as _, CreateUserSession, ExecutionError};

    #[tokio::test]
    async fn issues_a_session_for_an_active_user() {
        let svc = testing::service(mailer::Log);
        let user = testing::user(&svc, "active@example.com");

        let out = svc
            .execute(CreateUserSession { user_id: user.id })
            .await
            .unwrap();

        assert_eq!(out.user.id, user.id);
        assert!(out.expires_at > DateTime::now().coerce());
    }

    #[tokio::test]
    async fn refuses_an_inactive_user() {
        let svc = testing::service(mailer::Log);
        let mut user = testing::user(&svc, "inactive@example.com");
        user.activated_at = None;
        drop(
            svc.database
                .users
                .lock()
                .unwrap()
                .insert(user.id, user.clone()),
        );

        let err = svc
            .execute(CreateUserSession { user_id: user.id })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotActivated(_)));
    }

    #[tokio::test]
    async fn refuses_an_unknown_user() {
        let svc = testing::service(mailer::Log);

        let err = svc
            .execute(CreateUserSession {
                user_id: user::Id::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }
}
