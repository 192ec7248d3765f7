//! [`Command`] for quoting a relocation with a [`MoverService`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking, mover,
        mover_booking::{self, quote_price},
        user, Booking, MoverService, Quote, User,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for quoting a relocation with a [`MoverService`].
///
/// Nothing is persisted: the issued [`Quote`] lives in memory until it is
/// either confirmed with [`ConfirmMoverBooking`] or expires.
///
/// [`ConfirmMoverBooking`]: super::ConfirmMoverBooking
#[derive(Clone, Debug)]
pub struct QuoteMoverBooking {
    /// ID of the [`User`] requesting the [`Quote`].
    pub tenant_id: user::Id,

    /// ID of the [`MoverService`] to quote.
    pub mover_id: mover::Id,

    /// Optional ID of the [`Booking`] the relocation is tied to.
    pub booking_id: Option<booking::Id>,

    /// Pickup [`mover_booking::Address`].
    pub pickup: mover_booking::Address,

    /// Dropoff [`mover_booking::Address`].
    pub dropoff: mover_booking::Address,

    /// [`mover_booking::Distance`] of the relocation.
    pub distance_km: mover_booking::Distance,
}

impl<Db, M> Command<QuoteMoverBooking> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MoverService>, mover::Id>>,
            Ok = Option<MoverService>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::mover::RatingSummary, mover::Id>>,
            Ok = read::mover::RatingSummary,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: QuoteMoverBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let QuoteMoverBooking {
            tenant_id,
            mover_id,
            booking_id,
            pickup,
            dropoff,
            distance_km,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<User>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(tenant_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Select(By::<Option<MoverService>, _>::new(mover_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(mover_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if let Some(booking_id) = booking_id {
            self.database()
                .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                // A foreign `Booking` cannot anchor someone else's move.
                .filter(|b| b.tenant_id == tenant_id)
                .ok_or(E::BookingNotExists(booking_id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let summary = self
            .database()
            .execute(Select(By::<read::mover::RatingSummary, _>::new(mover_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Marketplace-wide moving tariff, not the `MoverService`'s own
        // advertised rate.
        let base_rate = self.config.moving_base_rate;
        let rate_per_km = self.config.moving_rate_per_km;
        let total_cost = quote_price(base_rate, rate_per_km, distance_km)
            .ok_or(E::PriceOverflow)
            .map_err(tracerr::wrap!())?;

        let quote = Quote {
            id: mover_booking::QuoteId::new(),
            booking_id,
            mover_id,
            pickup,
            dropoff,
            distance_km,
            base_rate,
            rate_per_km,
            total_cost,
            rating_snapshot: summary.average,
            quoted_at: DateTime::now().coerce(),
        };
        self.quotes().put(tenant_id, quote.clone()).await;

        Ok(quote)
    }
}

/// Error of [`QuoteMoverBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist (or was not placed by
    /// the acting tenant).
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Total cost of the relocation is not representable.
    #[display("Total cost of the relocation overflows")]
    PriceOverflow,

    /// [`MoverService`] with the provided ID does not exist.
    #[display("`MoverService(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] mover::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
