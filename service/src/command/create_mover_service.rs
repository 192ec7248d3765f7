//! [`Command`] for listing a new [`MoverService`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{contact, mover, user, MoverService, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing a new [`MoverService`] on the marketplace.
#[derive(Clone, Debug)]
pub struct CreateMoverService {
    /// ID of the [`User`] listing the [`MoverService`].
    pub owner_id: user::Id,

    /// [`mover::Name`] of the [`MoverService`].
    pub name: mover::Name,

    /// [`mover::Description`] of the [`MoverService`].
    pub description: mover::Description,

    /// Advertised rate per kilometre of the move.
    pub rate_per_km: Money,

    /// Indicator whether the [`MoverService`] offers cleaning on top of
    /// moving.
    pub provides_cleaning: bool,

    /// Contact [`contact::Phone`] of the [`MoverService`].
    pub contact_phone: contact::Phone,

    /// Optional contact [`contact::Email`] of the [`MoverService`].
    pub contact_email: Option<contact::Email>,
}

impl<Db, M> Command<CreateMoverService> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<MoverService>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MoverService;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMoverService,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMoverService {
            owner_id,
            name,
            description,
            rate_per_km,
            provides_cleaning,
            contact_phone,
            contact_email,
        } = cmd;

        if rate_per_km.amount <= Decimal::ZERO {
            return Err(tracerr::new!(E::InvalidRate(rate_per_km)));
        }

        self.database()
            .execute(Select(By::<Option<User>, _>::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(owner_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let service = MoverService {
            id: mover::Id::new(),
            owner_id,
            name,
            description,
            rate_per_km,
            provides_cleaning,
            contact_phone,
            contact_email,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(service.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(service)
    }
}

/// Error of [`CreateMoverService`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rate per kilometre is not positive.
    #[display("`{_0}` is not a valid rate per kilometre")]
    InvalidRate(#[error(not(source))] Money),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
