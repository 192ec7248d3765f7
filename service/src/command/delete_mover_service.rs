//! [`Command`] for delisting a [`MoverService`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{mover, user, MoverService},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for delisting a [`MoverService`].
///
/// Already placed [`MoverBooking`]s survive the deletion, only losing their
/// reference to the [`MoverService`].
///
/// [`MoverBooking`]: crate::domain::MoverBooking
#[derive(Clone, Copy, Debug)]
pub struct DeleteMoverService {
    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`MoverService`] to delete.
    pub service_id: mover::Id,
}

impl<Db, M> Command<DeleteMoverService> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<MoverService, mover::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteMoverService,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteMoverService {
            owner_id,
            service_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Select(By::<Option<MoverService>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `MoverService` is not distinguishable from a missing
            // one.
            .filter(|s| s.owner_id == owner_id)
            .ok_or(E::ServiceNotExists(service_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Delete(By::<MoverService, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeleteMoverService`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MoverService`] with the provided ID does not exist (or is not owned
    /// by the acting [`User`]).
    ///
    /// [`User`]: crate::domain::User
    #[display("`MoverService(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] mover::Id),
}
