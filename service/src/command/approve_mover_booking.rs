//! [`Command`] for approving a pending [`MoverBooking`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        mover,
        mover_booking::{self, Status},
        user, MoverBooking, MoverService,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving a pending [`MoverBooking`].
#[derive(Clone, Copy, Debug)]
pub struct ApproveMoverBooking {
    /// ID of the [`User`] approving the [`MoverBooking`].
    ///
    /// Must own the booked [`MoverService`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`MoverBooking`] to approve.
    pub booking_id: mover_booking::Id,
}

impl<Db, M> Command<ApproveMoverBooking> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MoverBooking>, mover_booking::Id>>,
            Ok = Option<MoverBooking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
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
        cmd: ApproveMoverBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let ApproveMoverBooking {
            owner_id,
            booking_id,
        } = cmd;

        transition_as_owner(self, owner_id, booking_id, Status::Confirmed)
            .await
    }
}

/// Transitions the [`MoverBooking`] with the provided ID into the given
/// [`Status`] on behalf of the owner of its [`MoverService`].
pub(super) async fn transition_as_owner<Db, M>(
    service: &Service<Db, M>,
    owner_id: user::Id,
    booking_id: mover_booking::Id,
    to: Status,
) -> Result<MoverBooking, Traced<ExecutionError>>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MoverBooking>, mover_booking::Id>>,
            Ok = Option<MoverBooking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<MoverBooking, mover_booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<MoverBooking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    use ExecutionError as E;

    let tx = service
        .database()
        .execute(Transact)
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

    // Avoid racing with the tenant's concurrent cancellation.
    tx.execute(Lock(By::<MoverBooking, _>::new(booking_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

    let mut booking = tx
        .execute(Select(By::<Option<MoverBooking>, _>::new(booking_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?
        .ok_or(E::BookingNotExists(booking_id))
        .map_err(tracerr::wrap!())?;
    let mover_id = booking
        .mover_id
        // A `MoverBooking` orphaned of its `MoverService` has no owner left
        // to act upon it.
        .ok_or(E::BookingNotExists(booking_id))
        .map_err(tracerr::wrap!())?;
    tx.execute(Select(By::<Option<MoverService>, _>::new(mover_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?
        // A `MoverBooking` of a foreign `MoverService` is hidden from this
        // owner.
        .filter(|s| s.owner_id == owner_id)
        .ok_or(E::BookingNotExists(booking_id))
        .map_err(tracerr::wrap!())
        .map(drop)?;

    booking
        .transition(to)
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

/// Error of [`ApproveMoverBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`MoverBooking`] with the provided ID does not exist (or concerns a
    /// [`MoverService`] the acting [`User`] does not own).
    ///
    /// [`User`]: crate::domain::User
    #[display("`MoverBooking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] mover_booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MoverBooking`] is not in a [`Status`] allowing the transition.
    #[display("{_0}")]
    #[from]
    InvalidStatus(mover_booking::InvalidTransition),
}
