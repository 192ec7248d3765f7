//! [`Command`] for placing a new [`Booking`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Status},
        contact, house, user, Booking, House, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the unique constraint forbidding a tenant to book the same
/// [`House`] twice.
const TENANT_HOUSE_UNIQ: &str = "bookings_tenant_id_house_id_key";

/// [`Command`] for placing a new [`Booking`] upon a [`House`].
///
/// The created [`Booking`] is [`Status::Pending`] until the landlord acts
/// upon it.
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`User`] placing the [`Booking`].
    pub tenant_id: user::Id,

    /// ID of the [`House`] to book.
    pub house_id: house::Id,

    /// [`DateTime`] the tenant intends to move in.
    pub move_in_at: booking::MoveInDateTime,

    /// Lease duration in months.
    pub lease_months: booking::LeaseMonths,

    /// Name of the tenant to snapshot on the [`Booking`].
    pub tenant_name: booking::TenantName,

    /// [`contact::Phone`] of the tenant to snapshot on the [`Booking`].
    pub tenant_phone: contact::Phone,

    /// [`contact::Email`] of the tenant to snapshot on the [`Booking`].
    pub tenant_email: contact::Email,

    /// Optional [`booking::Message`] to the landlord.
    pub message: booking::Message,
}

impl<Db, M> Command<CreateBooking> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<House>, house::Id>>,
            Ok = Option<House>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            tenant_id,
            house_id,
            move_in_at,
            lease_months,
            tenant_name,
            tenant_phone,
            tenant_email,
            message,
        } = cmd;

        if lease_months == 0 {
            return Err(tracerr::new!(E::InvalidLease));
        }

        let tenant = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(tenant_id))
            .map_err(tracerr::wrap!())?;

        let house = self
            .database()
            .execute(Select(By::<Option<House>, _>::new(house_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HouseNotExists(house_id))
            .map_err(tracerr::wrap!())?;
        if house.landlord_id == tenant.id {
            return Err(tracerr::new!(E::OwnHouse(house_id)));
        }
        if !house.is_available() {
            return Err(tracerr::new!(E::NoUnitsAvailable(house_id)));
        }

        let booking = Booking {
            id: booking::Id::new(),
            tenant_id,
            house_id,
            move_in_at,
            lease_months,
            tenant_name,
            tenant_phone,
            tenant_email,
            message,
            status: Status::Pending,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(booking.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(Some(TENANT_HOUSE_UNIQ)) {
                    tracerr::new!(E::AlreadyBooked(house_id))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Tenant has already booked this [`House`].
    ///
    /// Any existing [`Booking`] counts here, whatever [`Status`] it is in.
    #[display("`House(id: {_0})` is already booked by this tenant")]
    AlreadyBooked(#[error(not(source))] house::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`House`] with the provided ID does not exist.
    #[display("`House(id: {_0})` does not exist")]
    HouseNotExists(#[error(not(source))] house::Id),

    /// Lease duration is zero months.
    #[display("Lease must last at least 1 month")]
    InvalidLease,

    /// [`House`] has no vacant units left.
    #[display("`House(id: {_0})` has no available units")]
    NoUnitsAvailable(#[error(not(source))] house::Id),

    /// Tenant attempts to book their own [`House`].
    #[display("`House(id: {_0})` belongs to the booking tenant")]
    OwnHouse(#[error(not(source))] house::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::{booking, contact},
        infra::mailer,
        testing,
    };

    use super::{Command as _, CreateBooking, ExecutionError};

    fn cmd(
        tenant_id: crate::domain::user::Id,
        house_id: crate::domain::house::Id,
    ) -> CreateBooking {
        CreateBooking {
            tenant_id,
            house_id,
            move_in_at: DateTime::now().coerce(),
            lease_months: 6,
            tenant_name: booking::TenantName::new("Jane Tenant").unwrap(),
            tenant_phone: contact::Phone::new("+254711111111").unwrap(),
            tenant_email: contact::Email::new("jane@example.com").unwrap(),
            message: booking::Message::default(),
        }
    }

    #[tokio::test]
    async fn places_a_pending_booking() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let house = testing::house(&svc, landlord.id, 2);

        let placed =
            svc.execute(cmd(tenant.id, house.id)).await.unwrap();

        assert_eq!(placed.status, booking::Status::Pending);
        // Placing alone holds no unit.
        let units = svc.database.houses.lock().unwrap()[&house.id]
            .available_units;
        assert_eq!(units, 2);
    }

    #[tokio::test]
    async fn refuses_own_house() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let house = testing::house(&svc, landlord.id, 2);

        let err =
            svc.execute(cmd(landlord.id, house.id)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OwnHouse(_)));
    }

    #[tokio::test]
    async fn refuses_a_fully_booked_house() {
        let svc = testing::service(mailer::Log);
        let landlord = testing::user(&svc, "landlord@example.com");
        let tenant = testing::user(&svc, "tenant@example.com");
        let mut house = testing::house(&svc, landlord.id, 1);
        house.available_units = 0;
        drop(
            svc.database
                .houses
                .lock()
                .unwrap()
                .insert(house.id, house.clone()),
        );

        let err = svc.execute(cmd(tenant.id, house.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::NoUnitsAvailable(_)
        ));
    }
}
