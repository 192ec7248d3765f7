//! [`Command`] for approving a pending [`Booking`].

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

/// [`Command`] for approving a pending [`Booking`].
///
/// Approval reserves one unit of the booked [`House`].
#[derive(Clone, Copy, Debug)]
pub struct ApproveBooking {
    /// ID of the [`User`] approving the [`Booking`].
    ///
    /// Must own the booked [`House`].
    ///
    /// [`User`]: crate::domain::User
    pub landlord_id: user::Id,

    /// ID of the [`Booking`] to approve.
    pub booking_id: booking::Id,
}

impl<Db, M> Command<ApproveBooking> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
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

    async fn execute(
        &self,
        cmd: ApproveBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveBooking {
            landlord_id,
            booking_id,
        } = cmd;

        let placed = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent approvals racing for the same unit.
        tx.execute(Lock(By::<House, _>::new(placed.house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        let mut house = tx
            .execute(Select(By::<Option<House>, _>::new(booking.house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A `Booking` of a foreign `House` is hidden from this landlord.
            .filter(|h| h.landlord_id == landlord_id)
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .transition(Status::Approved)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if house.is_available() {
            house.adjust_available(-1);
            house.updated_at = booking.updated_at.coerce();
            tx.execute(Update(house))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            // Oversold listing. The approval still stands, only the counter
            // cannot drop below zero.
            tracing::warn!(
                house_id = %booking.house_id,
                booking_id = %booking.id,
                "approving `Booking` of a `House` with no available units",
            );
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

/// Error of [`ApproveBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist (or concerns a
    /// [`House`] the acting landlord does not own).
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] is not in a [`Status`] allowing approval.
    #[display("{_0}")]
    #[from]
    InvalidStatus(booking::InvalidTransition),
}

#[cfg(test)]
mod spec {
    use crate::{domain::booking::Status, infra::mailer, testing};

    use super::{ApproveBooking, Command as _, ExecutionError};

    #[tokio::test]
    async fn reserves_a_unit() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 3);
        let booking = testing::booking(&svc, tenant.id, house.id);

        let approved = svc
            .execute(ApproveBooking {
                landlord_id: landlord.id,
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(approved.status, Status::Approved);
        let house = svc.database.houses.lock().unwrap()[&house.id].clone();
        assert_eq!(house.available_units, 2);
    }

    #[tokio::test]
    async fn refuses_second_approval() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 3);
        let booking = testing::booking(&svc, tenant.id, house.id);

        let cmd = ApproveBooking {
            landlord_id: landlord.id,
            booking_id: booking.id,
        };
        drop(svc.execute(cmd).await.unwrap());

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::InvalidStatus(_)));
        let house = svc.database.houses.lock().unwrap()[&house.id].clone();
        assert_eq!(house.available_units, 2);
    }

    #[tokio::test]
    async fn tolerates_house_with_no_units_left() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let mut house = testing::house(&svc, landlord.id, 1);
        house.available_units = 0;
        drop(
            svc.database
                .houses
                .lock()
                .unwrap()
                .insert(house.id, house.clone()),
        );
        let booking = testing::booking(&svc, tenant.id, house.id);

        let approved = svc
            .execute(ApproveBooking {
                landlord_id: landlord.id,
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(approved.status, Status::Approved);
        let house = svc.database.houses.lock().unwrap()[&house.id].clone();
        assert_eq!(house.available_units, 0);
    }

    #[tokio::test]
    async fn hides_foreign_bookings() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let outsider = testing::user(&svc, "outsider@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 3);
        let booking = testing::booking(&svc, tenant.id, house.id);

        let err = svc
            .execute(ApproveBooking {
                landlord_id: outsider.id,
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::BookingNotExists(_)));
    }
}
