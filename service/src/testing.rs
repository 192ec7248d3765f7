//! In-memory doubles for exercising [`Command`]s without a live database.
//!
//! [`Command`]: crate::Command

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use common::{
    money::Currency,
    operations::{
        By, Commit, Delete, Dispatch, Insert, Lock, Select, Transact, Update,
        Upsert,
    },
    Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        booking, contact, house, mover, mover_booking, user, Booking, House,
        MoverBooking, MoverRating, MoverService, User,
    },
    infra::{
        database, mailer,
        mailer::{Mailer, Message},
        Database, Quotes,
    },
    read, Config, Service,
};

/// In-memory [`Database`] double backed by [`HashMap`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct InMemoryDb {
    pub(crate) houses: Arc<Mutex<HashMap<house::Id, House>>>,
    pub(crate) bookings: Arc<Mutex<HashMap<booking::Id, Booking>>>,
    pub(crate) services: Arc<Mutex<HashMap<mover::Id, MoverService>>>,
    pub(crate) ratings: Arc<Mutex<HashMap<mover::RatingId, MoverRating>>>,
    pub(crate) mover_bookings:
        Arc<Mutex<HashMap<mover_booking::Id, MoverBooking>>>,
    pub(crate) users: Arc<Mutex<HashMap<user::Id, User>>>,
}

type DbError = Traced<database::Error>;

impl Database<Transact> for InMemoryDb {
    type Ok = Self;
    type Err = DbError;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<W, B> Database<Lock<By<W, B>>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(&self, _: Lock<By<W, B>>) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<House>, house::Id>>> for InMemoryDb {
    type Ok = Option<House>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<House>, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.houses.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl Database<Insert<House>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Insert(house): Insert<House>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.houses.lock().unwrap().insert(house.id, house));
        Ok(())
    }
}

impl Database<Update<House>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Update(house): Update<House>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.houses.lock().unwrap().insert(house.id, house));
        Ok(())
    }
}

impl Database<Delete<By<House, house::Id>>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Delete(by): Delete<By<House, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.houses.lock().unwrap().remove(&by.into_inner()));
        Ok(())
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for InMemoryDb {
    type Ok = Option<Booking>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.bookings.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl Database<Insert<Booking>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.bookings.lock().unwrap().insert(booking.id, booking));
        Ok(())
    }
}

impl Database<Update<Booking>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.bookings.lock().unwrap().insert(booking.id, booking));
        Ok(())
    }
}

impl Database<Select<By<Option<MoverService>, mover::Id>>> for InMemoryDb {
    type Ok = Option<MoverService>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MoverService>, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.services.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl Database<Insert<MoverService>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Insert(service): Insert<MoverService>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.services.lock().unwrap().insert(service.id, service));
        Ok(())
    }
}

impl Database<Upsert<MoverRating>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Upsert(rating): Upsert<MoverRating>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut ratings = self.ratings.lock().unwrap();
        // One rating per `(service, user)` pair, the way the unique
        // constraint enforces it.
        let existing = ratings
            .values()
            .find(|r| {
                r.service_id == rating.service_id
                    && r.user_id == rating.user_id
            })
            .map(|r| r.id);
        let id = existing.unwrap_or(rating.id);
        drop(ratings.insert(id, MoverRating { id, ..rating }));
        Ok(())
    }
}

impl Database<Select<By<read::mover::RatingSummary, mover::Id>>>
    for InMemoryDb
{
    type Ok = read::mover::RatingSummary;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<read::mover::RatingSummary, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let service_id = by.into_inner();
        let ratings = self.ratings.lock().unwrap();
        let scores = ratings
            .values()
            .filter(|r| r.service_id == service_id)
            .map(|r| Decimal::from(r.score.u8()))
            .collect::<Vec<_>>();
        let count = i64::try_from(scores.len()).unwrap();
        let average = if scores.is_empty() {
            Decimal::ZERO
        } else {
            (scores.iter().sum::<Decimal>() / Decimal::from(count)).round_dp(1)
        };
        Ok(read::mover::RatingSummary { average, count })
    }
}

impl Database<Select<By<Option<MoverBooking>, mover_booking::Id>>>
    for InMemoryDb
{
    type Ok = Option<MoverBooking>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MoverBooking>, mover_booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .mover_bookings
            .lock()
            .unwrap()
            .get(&by.into_inner())
            .cloned())
    }
}

impl Database<Insert<MoverBooking>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Insert(booking): Insert<MoverBooking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            self.mover_bookings
                .lock()
                .unwrap()
                .insert(booking.id, booking),
        );
        Ok(())
    }
}

impl Database<Update<MoverBooking>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Update(booking): Update<MoverBooking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            self.mover_bookings
                .lock()
                .unwrap()
                .insert(booking.id, booking),
        );
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for InMemoryDb {
    type Ok = Option<User>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.users.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Option<User>, contact::Email>>> for InMemoryDb {
    type Ok = Option<User>;
    type Err = DbError;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, contact::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

impl Database<Insert<User>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.users.lock().unwrap().insert(user.id, user));
        Ok(())
    }
}

impl Database<Update<User>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.users.lock().unwrap().insert(user.id, user));
        Ok(())
    }
}

impl Database<Delete<By<User, user::Id>>> for InMemoryDb {
    type Ok = ();
    type Err = DbError;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.users.lock().unwrap().remove(&by.into_inner()));
        Ok(())
    }
}

/// [`Mailer`] double refusing every [`Message`].
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RejectingMailer;

impl Mailer<Dispatch<Message>> for RejectingMailer {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        _: Dispatch<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        Err(tracerr::new!(mailer::Error::Rejected))
    }
}

/// Builds a [`Service`] over an [`InMemoryDb`] and the provided [`Mailer`].
pub(crate) fn service<M>(mailer: M) -> Service<InMemoryDb, M> {
    Service {
        config: config(),
        database: InMemoryDb::default(),
        mailer,
        quotes: Quotes::new(Duration::from_secs(600)),
    }
}

/// Builds a [`Config`] for exercising [`Command`]s.
///
/// [`Command`]: crate::Command
pub(crate) fn config() -> Config {
    Config {
        jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"changeme"),
        jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"changeme"),
        moving_base_rate: kes(1000),
        moving_rate_per_km: kes(50),
        quote_ttl: Duration::from_secs(600),
        expire_stale_quotes: crate::task::expire_stale_quotes::Config {
            interval: Duration::from_secs(60),
        },
    }
}

/// [`Money`] in [`Currency::Kes`].
pub(crate) fn kes(amount: i64) -> Money {
    Money {
        amount: amount.into(),
        currency: Currency::Kes,
    }
}

/// Stored [`House`] with the provided number of units, all vacant.
pub(crate) fn house<M>(
    service: &Service<InMemoryDb, M>,
    landlord_id: user::Id,
    total_units: house::Units,
) -> House {
    let house = House {
        id: house::Id::new(),
        landlord_id,
        title: house::Title::new("Green Court").unwrap(),
        description: house::Description::new("Two-bedroom units").unwrap(),
        category: house::Category::Apartment,
        price: kes(25_000),
        num_rooms: 2,
        total_units,
        available_units: total_units,
        location: house::Location::new("Nairobi").unwrap(),
        latitude: None,
        longitude: None,
        amenities: house::Amenities::new(),
        contact_phone: contact::Phone::new("+254700000000").unwrap(),
        contact_email: None,
        created_at: common::DateTime::now().coerce(),
        updated_at: common::DateTime::now().coerce(),
    };
    drop(
        service
            .database
            .houses
            .lock()
            .unwrap()
            .insert(house.id, house.clone()),
    );
    house
}

/// Stored pending [`Booking`] of the provided [`House`].
pub(crate) fn booking<M>(
    service: &Service<InMemoryDb, M>,
    tenant_id: user::Id,
    house_id: house::Id,
) -> Booking {
    let booking = Booking {
        id: booking::Id::new(),
        tenant_id,
        house_id,
        move_in_at: common::DateTime::now().coerce(),
        lease_months: 12,
        tenant_name: booking::TenantName::new("Jane Tenant").unwrap(),
        tenant_phone: contact::Phone::new("+254711111111").unwrap(),
        tenant_email: contact::Email::new("jane@example.com").unwrap(),
        message: booking::Message::default(),
        status: booking::Status::Pending,
        created_at: common::DateTime::now().coerce(),
        updated_at: common::DateTime::now().coerce(),
    };
    drop(
        service
            .database
            .bookings
            .lock()
            .unwrap()
            .insert(booking.id, booking.clone()),
    );
    booking
}

/// Stored [`MoverService`] owned by the provided [`User`].
pub(crate) fn mover_service<M>(
    service: &Service<InMemoryDb, M>,
    owner_id: user::Id,
) -> MoverService {
    let mover = MoverService {
        id: mover::Id::new(),
        owner_id,
        name: mover::Name::new("Swift Movers").unwrap(),
        description: mover::Description::new("Moving and cleaning").unwrap(),
        rate_per_km: kes(80),
        provides_cleaning: true,
        contact_phone: contact::Phone::new("+254722222222").unwrap(),
        contact_email: None,
        created_at: common::DateTime::now().coerce(),
        updated_at: common::DateTime::now().coerce(),
    };
    drop(
        service
            .database
            .services
            .lock()
            .unwrap()
            .insert(mover.id, mover.clone()),
    );
    mover
}

/// Stored [`User`], activated right away.
pub(crate) fn user<M>(service: &Service<InMemoryDb, M>, email: &str) -> User {
    let user = User {
        id: user::Id::new(),
        email: contact::Email::new(email).unwrap(),
        activated_at: Some(common::DateTime::now().coerce()),
        created_at: common::DateTime::now().coerce(),
    };
    drop(
        service
            .database
            .users
            .lock()
            .unwrap()
            .insert(user.id, user.clone()),
    );
    user
}
