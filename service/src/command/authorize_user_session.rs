//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db, M> Command<AuthorizeUserSession> for Service<Db, M>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(session.user_id))
            .map_err(tracerr::wrap!())?;
        // A token survives deactivation of its `User`, the `Session` does
        // not.
        if !user.is_active() {
            return Err(tracerr::new!(E::UserNotActivated(user.id)));
        }

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to has not verified their e-mail.
    #[display("`User(id: {_0})` is not activated")]
    #[from(ignore)]
    UserNotActivated(#[error(not(source))] user::Id),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{command::CreateUserSession, infra::mailer, testing};

    use super::{AuthorizeUserSession, Command as _, ExecutionError};

    #[tokio::test]
    async fn authorizes_a_fresh_token() {
        let svc = testing::service(mailer::Log);
        let user = testing::user(&svc, "active@example.com");
        let out = svc
            .execute(CreateUserSession { user_id: user.id })
            .await
            .unwrap();

        let session = svc
            .execute(AuthorizeUserSession { token: out.token })
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);
    }

    #[tokio::test]
    async fn refuses_a_deactivated_user() {
        let svc = testing::service(mailer::Log);
        let user = testing::user(&svc, "active@example.com");
        let out = svc
            .execute(CreateUserSession { user_id: user.id })
            .await
            .unwrap();

        let mut user = out.user;
        user.activated_at = None;
        drop(
            svc.database
                .users
                .lock()
                .unwrap()
                .insert(user.id, user.clone()),
        );

        let err = svc
            .execute(AuthorizeUserSession { token: out.token })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotActivated(_)));
    }

    #[tokio::test]
    async fn refuses_a_garbage_token() {
        let svc = testing::service(mailer::Log);

        let err = svc
            .execute(AuthorizeUserSession {
                token: "not-a-jwt".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}
