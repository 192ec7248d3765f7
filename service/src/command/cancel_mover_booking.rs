//! [`Command`] for cancelling a [`MoverBooking`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        mover_booking::{self, Status},
        user, MoverBooking,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`MoverBooking`].
///
/// Tenants may cancel their own [`MoverBooking`]s while pending or
/// confirmed.
#[derive(Clone, Copy, Debug)]
pub struct CancelMoverBooking {
    /// ID of the [`User`] cancelling the [`MoverBooking`].
    ///
    /// Must be the tenant who placed it.
    ///
    /// [`User`]: crate::domain::User
    pub tenant_id: user::Id,

    /// ID of the [`MoverBooking`] to cancel.
    pub booking_id: mover_booking::Id,
}

impl<Db, M> Command<CancelMoverBooking> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MoverBooking>, mover_booking::Id>>,
            Ok = Option<MoverBooking>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<MoverBooking, mover_booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<MoverBooking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MoverBooking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelMoverBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelMoverBooking {
            tenant_id,
            booking_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with the owner's concurrent approval or rejection.
        tx.execute(Lock(By::<MoverBooking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<MoverBooking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `MoverBooking` is not distinguishable from a missing
            // one.
            .filter(|b| b.tenant_id == tenant_id)
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .transition(Status::Cancelled)
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

/// Error of [`CancelMoverBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`MoverBooking`] with the provided ID does not exist (or was not
    /// placed by the acting tenant).
    #[display("`MoverBooking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] mover_booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MoverBooking`] is not in a [`Status`] allowing cancellation.
    #[display("{_0}")]
    #[from]
    InvalidStatus(mover_booking::InvalidTransition),
}
