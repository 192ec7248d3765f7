//! [`Command`] for rejecting a pending [`Booking`].

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

/// [`Command`] for rejecting a pending [`Booking`].
///
/// Rejection does not touch the available units of the booked [`House`], as
/// a pending [`Booking`] never holds one.
#[derive(Clone, Copy, Debug)]
pub struct RejectBooking {
    /// ID of the [`User`] rejecting the [`Booking`].
    ///
    /// Must own the booked [`House`].
    ///
    /// [`User`]: crate::domain::User
    pub landlord_id: user::Id,

    /// ID of the [`Booking`] to reject.
    pub booking_id: booking::Id,
}

impl<Db, M> Command<RejectBooking> for Service<Db, M>
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
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RejectBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectBooking {
            landlord_id,
            booking_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a concurrent approval or cancellation.
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
        tx.execute(Select(By::<Option<House>, _>::new(booking.house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A `Booking` of a foreign `House` is hidden from this landlord.
            .filter(|h| h.landlord_id == landlord_id)
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        booking
            .transition(Status::Rejected)
            .map_err(tracerr::from_and_wrap!(=> E))?;

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

/// Error of [`RejectBooking`] [`Command`] execution.
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

    /// [`Booking`] is not in a [`Status`] allowing rejection.
    #[display("{_0}")]
    #[from]
    InvalidStatus(booking::InvalidTransition),
}
