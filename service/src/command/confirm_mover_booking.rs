//! [`Command`] for confirming a [`Quote`] into a [`MoverBooking`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        mover_booking::{self, Status},
        user, MoverBooking, Quote,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for confirming a previously issued [`Quote`] into a
/// [`MoverBooking`].
///
/// The [`Quote`] is consumed: confirming it a second time fails, whatever the
/// first attempt's outcome was.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmMoverBooking {
    /// ID of the [`User`] confirming the [`Quote`].
    ///
    /// Must be the one the [`Quote`] was issued to.
    ///
    /// [`User`]: crate::domain::User
    pub tenant_id: user::Id,

    /// ID of the [`Quote`] to confirm.
    pub quote_id: mover_booking::QuoteId,
}

impl<Db, M> Command<ConfirmMoverBooking> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<MoverBooking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MoverBooking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ConfirmMoverBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmMoverBooking {
            tenant_id,
            quote_id,
        } = cmd;

        let Quote {
            id: _,
            booking_id,
            mover_id,
            pickup,
            dropoff,
            distance_km,
            base_rate,
            rate_per_km,
            total_cost,
            rating_snapshot,
            quoted_at: _,
        } = self
            .quotes()
            .take(tenant_id, quote_id)
            .await
            .ok_or(E::QuoteNotExists(quote_id))
            .map_err(tracerr::wrap!())?;

        let booking = MoverBooking {
            id: mover_booking::Id::new(),
            booking_id,
            mover_id: Some(mover_id),
            tenant_id,
            pickup,
            dropoff,
            distance_km,
            base_rate,
            rate_per_km,
            total_cost,
            rating_snapshot,
            status: Status::Pending,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`ConfirmMoverBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Quote`] with the provided ID does not exist, has expired, or was
    /// issued to another [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] mover_booking::QuoteId),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        command::QuoteMoverBooking,
        domain::mover_booking::{self, Status},
        infra::mailer,
        testing,
    };

    use super::{Command as _, ConfirmMoverBooking, ExecutionError};

    fn quote_cmd(
        tenant_id: crate::domain::user::Id,
        mover_id: crate::domain::mover::Id,
    ) -> QuoteMoverBooking {
        QuoteMoverBooking {
            tenant_id,
            mover_id,
            booking_id: None,
            pickup: mover_booking::Address::new("Juja").unwrap(),
            dropoff: mover_booking::Address::new("Thika").unwrap(),
            distance_km: mover_booking::Distance::new(10.into()).unwrap(),
        }
    }

    #[tokio::test]
    async fn persists_a_pending_booking_at_the_quoted_price() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        let quote = svc.execute(quote_cmd(tenant.id, mover.id)).await.unwrap();
        // 1000 + 10 km × 50.
        assert_eq!(quote.total_cost, testing::kes(1500));

        let booking = svc
            .execute(ConfirmMoverBooking {
                tenant_id: tenant.id,
                quote_id: quote.id,
            })
            .await
            .unwrap();

        assert_eq!(booking.status, Status::Pending);
        assert_eq!(booking.total_cost, testing::kes(1500));
        assert_eq!(booking.mover_id, Some(mover.id));
        assert!(svc
            .database
            .mover_bookings
            .lock()
            .unwrap()
            .contains_key(&booking.id));
    }

    #[tokio::test]
    async fn consumes_the_quote() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        let quote = svc.execute(quote_cmd(tenant.id, mover.id)).await.unwrap();
        let cmd = ConfirmMoverBooking {
            tenant_id: tenant.id,
            quote_id: quote.id,
        };
        drop(svc.execute(cmd).await.unwrap());

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::QuoteNotExists(_)));
    }

    #[tokio::test]
    async fn refuses_a_foreign_quote() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let outsider = testing::user(&svc, "outsider@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        let quote = svc.execute(quote_cmd(tenant.id, mover.id)).await.unwrap();

        let err = svc
            .execute(ConfirmMoverBooking {
                tenant_id: outsider.id,
                quote_id: quote.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::QuoteNotExists(_)));

        // The failed foreign attempt must not burn the tenant's quote.
        drop(
            svc.execute(ConfirmMoverBooking {
                tenant_id: tenant.id,
                quote_id: quote.id,
            })
            .await
            .unwrap(),
        );
    }

    #[tokio::test]
    async fn snapshots_the_rating_average() {
        let svc = testing::service(mailer::Log);
        let owner = testing::user(&svc, "owner@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let rater = testing::user(&svc, "rater@example.com");
        let mover = testing::mover_service(&svc, owner.id);

        drop(
            svc.execute(crate::command::SubmitMoverRating {
                user_id: rater.id,
                service_id: mover.id,
                score: crate::domain::mover::Score::new(4).unwrap(),
                comment: None,
            })
            .await
            .unwrap(),
        );

        let quote = svc.execute(quote_cmd(tenant.id, mover.id)).await.unwrap();
        assert_eq!(quote.rating_snapshot, Decimal::from(4));
    }
}
