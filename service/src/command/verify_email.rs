//! [`Command`] for verifying a [`User`]'s e-mail by a magic link.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, magic_link, MagicLink},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::{create_user_session, Command, CreateUserSession};

/// [`Command`] for verifying a [`User`]'s e-mail by a magic link.
///
/// A valid [`magic_link::Token`] activates the [`User`] and immediately
/// signs them in.
#[derive(Clone, Debug, From)]
pub struct VerifyEmail {
    /// [`magic_link::Token`] to verify.
    pub token: magic_link::Token,
}

impl<Db, M> Command<VerifyEmail> for Service<Db, M>
where
    Self: Command<
        CreateUserSession,
        Ok = create_user_session::Output,
        Err = Traced<create_user_session::ExecutionError>,
    >,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<User, user::Id>>, Err = Traced<database::Error>>
        + Database<Update<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = create_user_session::Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: VerifyEmail) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let VerifyEmail { token } = cmd;

        let link = jsonwebtoken::decode::<MagicLink>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a concurrent verification of the same link.
        tx.execute(Lock(By::<User, _>::new(link.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut user = tx
            .execute(Select(By::<Option<User>, _>::new(link.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A link issued for an e-mail the `User` no longer holds is
            // void.
            .filter(|u| u.email == link.email)
            .ok_or(E::UserNotExists(link.user_id))
            .map_err(tracerr::wrap!())?;

        if user.activated_at.is_none() {
            user.activated_at = Some(DateTime::now().coerce());
            tx.execute(Update(user.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.execute(CreateUserSession { user_id: user.id })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`VerifyEmail`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// Error of issuing the [`Session`] for the activated [`User`].
    ///
    /// [`Session`]: crate::domain::user::Session
    #[display("Failed to create a `Session`: {_0}")]
    Session(create_user_session::ExecutionError),

    /// [`User`] the [`MagicLink`] was issued for does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{domain::user::MagicLink, infra::mailer, testing};

    use super::{Command as _, ExecutionError, VerifyEmail};

    fn token_for(
        svc: &crate::Service<testing::InMemoryDb, mailer::Log>,
        user: &crate::domain::User,
    ) -> crate::domain::user::magic_link::Token {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &MagicLink {
                user_id: user.id,
                email: user.email.clone(),
                expires_at: (DateTime::now()
                    + std::time::Duration::from_secs(600))
                .coerce(),
            },
            &svc.config.jwt_encoding_key,
        )
        .unwrap()
        .parse()
        .unwrap()
    }

    #[tokio::test]
    async fn activates_the_user_and_signs_them_in() {
        let svc = testing::service(mailer::Log);
        let mut user = testing::user(&svc, "fresh@example.com");
        user.activated_at = None;
        drop(
            svc.database
                .users
                .lock()
                .unwrap()
                .insert(user.id, user.clone()),
        );
        let token = token_for(&svc, &user);

        let out = svc.execute(VerifyEmail { token }).await.unwrap();

        assert_eq!(out.user.id, user.id);
        assert!(out.user.is_active());
        assert!(svc.database.users.lock().unwrap()[&user.id].is_active());
    }

    #[tokio::test]
    async fn is_idempotent_for_an_already_active_user() {
        let svc = testing::service(mailer::Log);
        let user = testing::user(&svc, "active@example.com");
        let first_activation = user.activated_at;
        let token = token_for(&svc, &user);

        let out = svc.execute(VerifyEmail { token }).await.unwrap();

        assert!(out.user.is_active());
        let stored = svc.database.users.lock().unwrap()[&user.id].clone();
        assert_eq!(stored.activated_at, first_activation);
    }

    #[tokio::test]
    async fn refuses_a_link_for_a_gone_user() {
        let svc = testing::service(mailer::Log);
        let user = testing::user(&svc, "gone@example.com");
        let token = token_for(&svc, &user);
        drop(svc.database.users.lock().unwrap().remove(&user.id));

        let err = svc.execute(VerifyEmail { token }).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }

    #[tokio::test]
    async fn refuses_a_garbage_token() {
        let svc = testing::service(mailer::Log);

        let err = svc
            .execute(VerifyEmail {
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
