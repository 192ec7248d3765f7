//! [`Command`] for delisting a [`House`].

use common::operations::{By, Commit, Delete, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{house, user, House},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for delisting a [`House`].
///
/// All the [`Booking`]s and [`house::Image`]s of the [`House`] are removed
/// along with it.
///
/// [`Booking`]: crate::domain::Booking
#[derive(Clone, Copy, Debug)]
pub struct DeleteHouse {
    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub landlord_id: user::Id,

    /// ID of the [`House`] to delete.
    pub house_id: house::Id,
}

impl<Db, M> Command<DeleteHouse> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<House>, house::Id>>,
            Ok = Option<House>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<House, house::Id>>, Err = Traced<database::Error>>
        + Database<Delete<By<House, house::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteHouse) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteHouse {
            landlord_id,
            house_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `House`.
        tx.execute(Lock(By::new(house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<House>, _>::new(house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `House` is not distinguishable from a missing one.
            .filter(|h| h.landlord_id == landlord_id)
            .ok_or(E::HouseNotExists(house_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Delete(By::<House, _>::new(house_id)))
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

/// Error of [`DeleteHouse`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`House`] with the provided ID does not exist (or is not owned by the
    /// acting landlord).
    #[display("`House(id: {_0})` does not exist")]
    HouseNotExists(#[error(not(source))] house::Id),
}
