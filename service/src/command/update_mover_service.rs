//! [`Command`] for updating a [`MoverService`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{contact, mover, user, MoverService},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`MoverService`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateMoverService {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// ID of the [`MoverService`] to update.
    pub service_id: mover::Id,

    /// New [`mover::Name`] of the [`MoverService`].
    pub name: Option<mover::Name>,

    /// New [`mover::Description`] of the [`MoverService`].
    pub description: Option<mover::Description>,

    /// New rate per kilometre of the [`MoverService`].
    pub rate_per_km: Option<Money>,

    /// New cleaning indicator of the [`MoverService`].
    pub provides_cleaning: Option<bool>,

    /// New contact [`contact::Phone`] of the [`MoverService`].
    pub contact_phone: Option<contact::Phone>,

    /// New contact [`contact::Email`] of the [`MoverService`].
    pub contact_email: Option<Option<contact::Email>>,
}

impl<Db, M> Command<UpdateMoverService> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
            Err = Traced<database::Error>,
        > + Database<Update<MoverService>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MoverService;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateMoverService,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateMoverService {
            owner_id,
            service_id,
            name,
            description,
            rate_per_km,
            provides_cleaning,
            contact_phone,
            contact_email,
        } = cmd;

        if let Some(rate) = rate_per_km {
            if rate.amount <= Decimal::ZERO {
                return Err(tracerr::new!(E::InvalidRate(rate)));
            }
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut service = tx
            .execute(Select(By::<Option<MoverService>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `MoverService` is not distinguishable from a missing
            // one.
            .filter(|s| s.owner_id == owner_id)
            .ok_or(E::ServiceNotExists(service_id))
            .map_err(tracerr::wrap!())?;

        if let Some(name) = name {
            service.name = name;
        }
        if let Some(description) = description {
            service.description = description;
        }
        if let Some(rate) = rate_per_km {
            service.rate_per_km = rate;
        }
        if let Some(provides_cleaning) = provides_cleaning {
            service.provides_cleaning = provides_cleaning;
        }
        if let Some(contact_phone) = contact_phone {
            service.contact_phone = contact_phone;
        }
        if let Some(contact_email) = contact_email {
            service.contact_email = contact_email;
        }
        service.updated_at = DateTime::now().coerce();

        tx.execute(Update(service.clone()))
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

/// Error of [`UpdateMoverService`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rate per kilometre is not positive.
    #[display("`{_0}` is not a valid rate per kilometre")]
    InvalidRate(#[error(not(source))] Money),

    /// [`MoverService`] with the provided ID does not exist (or is not owned
    /// by the acting [`User`]).
    ///
    /// [`User`]: crate::domain::User
    #[display("`MoverService(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] mover::Id),
}
