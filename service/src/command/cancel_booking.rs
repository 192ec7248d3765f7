//! [`Command`] for cancelling a [`Booking`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Status},
        house, user, Booking, House,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Booking`].
///
/// Tenants may cancel their own [`Booking`]s while pending or approved.
/// Cancelling an approved [`Booking`] releases the unit it held.
#[derive(Clone, Copy, Debug)]
pub struct CancelBooking {
    /// ID of the [`User`] cancelling the [`Booking`].
    ///
    /// Must be the tenant who placed it.
    ///
    /// [`User`]: crate::domain::User
    pub tenant_id: user::Id,

    /// ID of the [`Booking`] to cancel.
    pub booking_id: booking::Id,
}

impl<Db, M> Command<CancelBooking> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<House>, house::Id>>,
            Ok = Option<House>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Booking, booking::Id>>, Err = Traced<database::Error>>
        + Database<Lock<By<House, house::Id>>, Err = Traced<database::Error>>
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Update<House>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking {
            tenant_id,
            booking_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a concurrent approval or rejection.
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `Booking` is not distinguishable from a missing one.
            .filter(|b| b.tenant_id == tenant_id)
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let was_approved = booking.status == Status::Approved;
        booking
            .transition(Status::Cancelled)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        if was_approved {
            // The held unit goes back into the vacant pool.
            tx.execute(Lock(By::<House, _>::new(booking.house_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            let house = tx
                .execute(Select(By::<Option<House>, _>::new(booking.house_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            // The `House` may have been delisted meanwhile.
            if let Some(mut house) = house {
                house.adjust_available(1);
                house.updated_at = booking.updated_at.coerce();
                tx.execute(Update(house))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Update(booking.clone()))
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

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist (or was not placed by
    /// the acting tenant).
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] is not in a [`Status`] allowing cancellation.
    #[display("{_0}")]
    #[from]
    InvalidStatus(booking::InvalidTransition),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::ApproveBooking, domain::booking::Status, infra::mailer,
        testing,
    };

    use super::{CancelBooking, Command as _, ExecutionError};

    #[tokio::test]
    async fn releases_the_unit_of_an_approved_booking() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant_a = testing::user(&svc, "a@example.com");
        let tenant_b = testing::user(&svc, "b@example.com");
        let house = testing::house(&svc, landlord.id, 3);
        let booking_a = testing::booking(&svc, tenant_a.id, house.id);
        let booking_b = testing::booking(&svc, tenant_b.id, house.id);

        drop(
            svc.execute(ApproveBooking {
                landlord_id: landlord.id,
                booking_id: booking_a.id,
            })
            .await
            .unwrap(),
        );
        drop(
            svc.execute(ApproveBooking {
                landlord_id: landlord.id,
                booking_id: booking_b.id,
            })
            .await
            .unwrap(),
        );
        let units = svc.database.houses.lock().unwrap()[&house.id]
            .available_units;
        assert_eq!(units, 1);

        let cancelled = svc
            .execute(CancelBooking {
                tenant_id: tenant_a.id,
                booking_id: booking_a.id,
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, Status::Cancelled);
        let units = svc.database.houses.lock().unwrap()[&house.id]
            .available_units;
        assert_eq!(units, 2);
    }

    #[tokio::test]
    async fn keeps_units_intact_for_a_pending_booking() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 2);
        let booking = testing::booking(&svc, tenant.id, house.id);

        let cancelled = svc
            .execute(CancelBooking {
                tenant_id: tenant.id,
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, Status::Cancelled);
        let units = svc.database.houses.lock().unwrap()[&house.id]
            .available_units;
        assert_eq!(units, 2);
    }

    #[tokio::test]
    async fn never_exceeds_total_units() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 2);
        let mut booking = testing::booking(&svc, tenant.id, house.id);
        // An approved row whose unit was never taken off the counter.
        booking.status = Status::Approved;
        drop(
            svc.database
                .bookings
                .lock()
                .unwrap()
                .insert(booking.id, booking.clone()),
        );

        drop(
            svc.execute(CancelBooking {
                tenant_id: tenant.id,
                booking_id: booking.id,
            })
            .await
            .unwrap(),
        );

        let units = svc.database.houses.lock().unwrap()[&house.id]
            .available_units;
        assert_eq!(units, 2);
    }

    #[tokio::test]
    async fn refuses_foreign_bookings() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let outsider = testing::user(&svc, "outsider@example.com");
        let house = testing::house(&svc, landlord.id, 1);
        let booking = testing::booking(&svc, tenant.id, house.id);

        let err = svc
            .execute(CancelBooking {
                tenant_id: outsider.id,
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::BookingNotExists(_)));
    }
}
