//! [`Command`] for rating a [`MoverService`].

use common::{
    operations::{By, Select, Upsert},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{mover, user, MoverRating, MoverService, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for rating a [`MoverService`].
///
/// A [`User`] holds at most one [`MoverRating`] per [`MoverService`]:
/// submitting again overwrites the previous score and comment.
#[derive(Clone, Debug)]
pub struct SubmitMoverRating {
    /// ID of the [`User`] submitting the [`MoverRating`].
    pub user_id: user::Id,

    /// ID of the [`MoverService`] being rated.
    pub service_id: mover::Id,

    /// [`mover::Score`] given to the [`MoverService`].
    pub score: mover::Score,

    /// Optional [`mover::Comment`] accompanying the score.
    pub comment: Option<mover::Comment>,
}

impl<Db, M> Command<SubmitMoverRating> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
            Err = Traced<database::Error>,
        > + Database<Upsert<MoverRating>, Err = Traced<database::Error>>,
{
    type Ok = MoverRating;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitMoverRating,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitMoverRating {
            user_id,
            service_id,
            score,
            comment,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let service = self
            .database()
            .execute(Select(By::<Option<MoverService>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(service_id))
            .map_err(tracerr::wrap!())?;
        if service.owner_id == user_id {
            return Err(tracerr::new!(E::OwnService(service_id)));
        }

        let rating = MoverRating {
            id: mover::RatingId::new(),
            service_id,
            user_id,
            score,
            comment,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Upsert(rating.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rating)
    }
}

/// Error of [`SubmitMoverRating`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] attempts to rate their own [`MoverService`].
    #[display("`MoverService(id: {_0})` belongs to the rating `User`")]
    OwnService(#[error(not(source))] mover::Id),

    /// [`MoverService`] with the provided ID does not exist.
    #[display("`MoverService(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] mover::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{domain::mover, infra::mailer, testing};

    use super::{Command as _, ExecutionError, SubmitMoverRating};

    #[tokio::test]
    async fn overwrites_the_previous_rating_of_the_same_user() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let rater = testing::user(&svc, "rater@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        drop(
            svc.execute(SubmitMoverRating {
                user_id: rater.id,
                service_id: mover.id,
                score: mover::Score::new(2).unwrap(),
                comment: None,
            })
            .await
            .unwrap(),
        );
        drop(
            svc.execute(SubmitMoverRating {
                user_id: rater.id,
                service_id: mover.id,
                score: mover::Score::new(5).unwrap(),
                comment: mover::Comment::new("Better this time"),
            })
            .await
            .unwrap(),
        );

        let ratings = svc.database.ratings.lock().unwrap();
        let of_service = ratings
            .values()
            .filter(|r| r.service_id == mover.id)
            .collect::<Vec<_>>();
        assert_eq!(of_service.len(), 1);
        assert_eq!(of_service[0].score, mover::Score::new(5).unwrap());
    }

    #[tokio::test]
    async fn averages_over_distinct_users() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let first = testing::user(&svc, "first@example.com");
        let second = testing::user(&svc, "second@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        for (rater, score) in [(first.id, 4), (second.id, 5)] {
            drop(
                svc.execute(SubmitMoverRating {
                    user_id: rater,
                    service_id: mover.id,
                    score: mover::Score::new(score).unwrap(),
                    comment: None,
                })
                .await
                .unwrap(),
            );
        }

        let summary = svc
            .database()
            .execute(common::operations::Select(common::operations::By::<
                crate::read::mover::RatingSummary,
                _,
            >::new(mover.id)))
            .await
            .unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, Decimal::new(45, 1));
    }

    #[tokio::test]
    async fn forbids_rating_own_service() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        let err = svc
            .execute(SubmitMoverRating {
                user_id: owner.id,
                service_id: mover.id,
                score: mover::Score::new(5).unwrap(),
                comment: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OwnService(_)));
    }
}
