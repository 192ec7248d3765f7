//! [`Command`] for updating a listed [`House`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::house::{Amenities, Category, Description, Location, Title};
use crate::{
    domain::{contact, house, user, House},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a listed [`House`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateHouse {
    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub landlord_id: user::Id,

    /// ID of the [`House`] to update.
    pub house_id: house::Id,

    /// New [`Title`] of the [`House`].
    pub title: Option<house::Title>,

    /// New [`Description`] of the [`House`].
    pub description: Option<house::Description>,

    /// New [`Category`] of the [`House`].
    pub category: Option<house::Category>,

    /// New monthly rent of the [`House`].
    pub price: Option<Money>,

    /// New number of rooms in a single unit of the [`House`].
    pub num_rooms: Option<house::NumRooms>,

    /// New total number of bookable units of the [`House`].
    pub total_units: Option<house::Units>,

    /// New [`Location`] of the [`House`].
    pub location: Option<house::Location>,

    /// New latitude of the [`House`].
    pub latitude: Option<Option<Decimal>>,

    /// New longitude of the [`House`].
    pub longitude: Option<Option<Decimal>>,

    /// New [`Amenities`] of the [`House`].
    pub amenities: Option<house::Amenities>,

    /// New contact [`contact::Phone`] of the landlord.
    pub contact_phone: Option<contact::Phone>,

    /// New contact [`contact::Email`] of the landlord.
    pub contact_email: Option<Option<contact::Email>>,
}

impl<Db, M> Command<UpdateHouse> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<House>, house::Id>>,
            Ok = Option<House>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<House, house::Id>>, Err = Traced<database::Error>>
        + Database<Update<House>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = House;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateHouse) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateHouse {
            landlord_id,
            house_id,
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

        if let Some(p) = price {
            if p.amount <= Decimal::ZERO {
                return Err(tracerr::new!(E::InvalidPrice(p)));
            }
        }
        if total_units == Some(0) {
            return Err(tracerr::new!(E::NoUnits));
        }

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

        let mut house = tx
            .execute(Select(By::<Option<House>, _>::new(house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            // A foreign `House` is not distinguishable from a missing one.
            .filter(|h| h.landlord_id == landlord_id)
            .ok_or(E::HouseNotExists(house_id))
            .map_err(tracerr::wrap!())?;

        if let Some(title) = title {
            house.title = title;
        }
        if let Some(description) = description {
            house.description = description;
        }
        if let Some(category) = category {
            house.category = category;
        }
        if let Some(price) = price {
            house.price = price;
        }
        if let Some(num_rooms) = num_rooms {
            house.num_rooms = num_rooms;
        }
        if let Some(new_total) = total_units {
            house.resize_total(new_total);
        }
        if let Some(location) = location {
            house.location = location;
        }
        if let Some(latitude) = latitude {
            house.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            house.longitude = longitude;
        }
        if let Some(amenities) = amenities {
            house.amenities = amenities;
        }
        if let Some(contact_phone) = contact_phone {
            house.contact_phone = contact_phone;
        }
        if let Some(contact_email) = contact_email {
            house.contact_email = contact_email;
        }
        house.updated_at = DateTime::now().coerce();

        tx.execute(Update(house.clone()))
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

/// Error of [`UpdateHouse`] [`Command`] execution.
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

    /// Monthly rent is not positive.
    #[display("`{_0}` is not a valid monthly rent")]
    InvalidPrice(#[error(not(source))] Money),

    /// [`House`] cannot be left without bookable units.
    #[display("`House` must have at least 1 unit")]
    NoUnits,
}
