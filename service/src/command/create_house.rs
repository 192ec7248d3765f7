//! [`Command`] for listing a new [`House`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::house::{
    Amenities, Category, Description, Location, NumRooms, Title, Units,
};
use crate::{
    domain::{contact, house, user, House, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing a new [`House`].
#[derive(Clone, Debug)]
pub struct CreateHouse {
    /// ID of the [`User`] listing the [`House`].
    pub landlord_id: user::Id,

    /// [`Title`] of a new [`House`].
    pub title: house::Title,

    /// [`Description`] of a new [`House`].
    pub description: house::Description,

    /// [`Category`] of a new [`House`].
    pub category: house::Category,

    /// Monthly rent of a new [`House`].
    pub price: Money,

    /// [`NumRooms`] in a single unit of a new [`House`].
    pub num_rooms: house::NumRooms,

    /// Total number of bookable [`Units`] of a new [`House`].
    pub total_units: house::Units,

    /// [`Location`] of a new [`House`].
    pub location: house::Location,

    /// Latitude of a new [`House`], if geocoded.
    pub latitude: Option<Decimal>,

    /// Longitude of a new [`House`], if geocoded.
    pub longitude: Option<Decimal>,

    /// [`Amenities`] of a new [`House`].
    pub amenities: house::Amenities,

    /// Contact [`contact::Phone`] of the landlord.
    pub contact_phone: contact::Phone,

    /// Contact [`contact::Email`] of the landlord, if provided.
    pub contact_email: Option<contact::Email>,
}

impl<Db, M> Command<CreateHouse> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<House>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = House;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateHouse) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateHouse {
            landlord_id,
            title,
            description,
            category,
            price,
            num_rooms,
            total_units,
            location,
            latitude,
            longitude,
            amenities,
            contact_phone,
            contact_email,
        } = cmd;

        if total_units < 1 {
            return Err(tracerr::new!(E::NoUnits));
        }
        if price.amount <= Decimal::ZERO {
            return Err(tracerr::new!(E::InvalidPrice(price)));
        }

        drop(
            self.database()
                .execute(Select(By::<Option<User>, _>::new(landlord_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotExists(landlord_id))
                .map_err(tracerr::wrap!())?,
        );

        let house = House {
            id: house::Id::new(),
            landlord_id,
            title,
            description,
            category,
            price,
            num_rooms,
            total_units,
            // Every unit of a fresh listing is vacant.
            available_units: total_units,
            location,
            latitude,
            longitude,
            amenities,
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
        tx.execute(Insert(house.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(house)
    }
}

/// Error of [`CreateHouse`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Monthly rent is not positive.
    #[display("`{_0}` is not a valid monthly rent")]
    InvalidPrice(#[error(not(source))] Money),

    /// [`House`] cannot be listed without bookable units.
    #[display("`House` must have at least 1 unit")]
    NoUnits,

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
