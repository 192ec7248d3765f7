//! [`Command`] for rejecting a pending [`MoverBooking`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
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

use super::{approve_mover_booking::transition_as_owner, Command};

pub use super::approve_mover_booking::ExecutionError;

/// [`Command`] for rejecting a pending [`MoverBooking`].
#[derive(Clone, Copy, Debug)]
pub struct RejectMoverBooking {
    /// ID of the [`User`] rejecting the [`MoverBooking`].
    ///
    /// Must own the booked [`MoverService`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`MoverBooking`] to reject.
    pub booking_id: mover_booking::Id,
}

impl<Db, M> Command<RejectMoverBooking> for Service<Db, M>
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
        cmd: RejectMoverBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let RejectMoverBooking {
            owner_id,
            booking_id,
        } = cmd;

        transition_as_owner(self, owner_id, booking_id, Status::Rejected).await
    }
}
