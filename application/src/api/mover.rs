//! [`Mover`]-related definitions of the movers marketplace.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// Moving company offering relocation services.
#[derive(Clone, Debug, From)]
pub struct Mover {
    /// ID of this [`Mover`].
    pub id: Id,

    /// Underlying [`domain::MoverService`].
    service: OnceCell<domain::MoverService>,
}

impl From<domain::MoverService> for Mover {
    fn from(service: domain::MoverService) -> Self {
        Self {
            id: service.id.into(),
            service: OnceCell::new_with(Some(service)),
        }
    }
}

impl Mover {
    /// Creates a new [`Mover`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Mover`] with the provided ID exists,
    /// otherwise accessing this [`Mover`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            service: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::MoverService`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::MoverService`] doesn't exist.
    async fn service(
        &self,
        ctx: &Context,
    ) -> Result<&domain::MoverService, Error> {
        let id = self.id.into();
        self.service
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::mover::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|s| {
                        future::ready(
                            s.ok_or_else(|| NotExistsError::NotExists.into()),
                        )
                    })
            })
            .await
    }
}

/// Moving company offering relocation services.
#[graphql_object(context = Context)]
impl Mover {
    /// Unique identifier of this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` owning this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let owner_id = self.service(ctx).await?.owner_id;
        #[expect(
            unsafe_code,
            reason = "`Mover` loaded from repository guarantees owner \
                      existence"
        )]
        Ok(unsafe { api::User::new_unchecked(owner_id) })
    }

    /// Name of this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.service(ctx).await?.name.clone().into())
    }

    /// Description of this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(&self, ctx: &Context) -> Result<Description, Error> {
        Ok(self.service(ctx).await?.description.clone().into())
    }

    /// `Money` charged per kilometer of a move.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.ratePerKm",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rate_per_km(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.service(ctx).await?.rate_per_km)
    }

    /// Indicator whether this `Mover` also provides cleaning.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.providesCleaning",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn provides_cleaning(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.service(ctx).await?.provides_cleaning)
    }

    /// Contact phone of this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.contactPhone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contact_phone(
        &self,
        ctx: &Context,
    ) -> Result<api::user::Phone, Error> {
        Ok(self.service(ctx).await?.contact_phone.clone().into())
    }

    /// Contact e-mail of this `Mover`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.contactEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contact_email(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Email>, Error> {
        Ok(self
            .service(ctx)
            .await?
            .contact_email
            .clone()
            .map(Into::into))
    }

    /// Aggregate rating of this `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<RatingSummary, Error> {
        ctx.service()
            .execute(query::mover::RatingSummary::by(self.id.into()))
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `Rating`s left for this `Mover`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.ratings",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ratings(&self, ctx: &Context) -> Result<Vec<Rating>, Error> {
        ctx.service()
            .execute(query::mover::Ratings::by(self.id.into()))
            .await
            .map(|ratings| ratings.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `DateTime` when this `Mover` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.service(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Mover` was updated the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Mover.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.service(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Mover`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::mover::Id)]
#[into(domain::mover::Id)]
#[graphql(name = "MoverId", transparent)]
pub struct Id(Uuid);

/// Name of a `Mover`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "MoverName", with = scalar::Via::<domain::mover::Name>)]
pub struct Name(domain::mover::Name);

/// Description of a `Mover`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MoverDescription",
    with = scalar::Via::<domain::mover::Description>,
)]
pub struct Description(domain::mover::Description);

/// Aggregate over the `Rating`s of a single `Mover`.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct RatingSummary(service::read::mover::RatingSummary);

/// Aggregate over the `Rating`s of a single `Mover`.
#[graphql_object(name = "MoverRatingSummary", context = Context)]
impl RatingSummary {
    /// Average score, rounded to 1 decimal place.
    ///
    /// Zero when no `Rating`s exist.
    pub fn average(&self) -> f64 {
        self.0.average.to_f64().unwrap_or_default()
    }

    /// Number of `Rating`s aggregated.
    pub fn count(&self) -> Result<i32, Error> {
        self.0.count.try_into().map_err(AsError::into_error)
    }
}

/// Review left by a `User` for a `Mover`.
#[derive(Clone, Debug, From, Into)]
pub struct Rating(domain::MoverRating);

/// Review left by a `User` for a `Mover`.
#[graphql_object(name = "MoverRating", context = Context)]
impl Rating {
    /// Unique identifier of this `Rating`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> RatingId {
        self.0.id.into()
    }

    /// `User` who left this `Rating`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Rating` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// Score of this `Rating`, from 1 to 5 stars inclusive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.score",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn score(&self) -> i32 {
        self.0.score.u8().into()
    }

    /// Comment accompanying the score, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.comment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn comment(&self) -> Option<Comment> {
        self.0.comment.clone().map(Into::into)
    }

    /// `DateTime` when this `Rating` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Rating` was updated the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverRating.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Rating`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::mover::RatingId)]
#[into(domain::mover::RatingId)]
#[graphql(name = "MoverRatingId", transparent)]
pub struct RatingId(Uuid);

/// Comment accompanying a `Rating`'s score.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MoverRatingComment",
    with = scalar::Via::<domain::mover::Comment>,
)]
pub struct Comment(domain::mover::Comment);

/// Order of a relocation with a `Mover`.
#[derive(Clone, Debug, From)]
pub struct MoverBooking {
    /// ID of this [`MoverBooking`].
    pub id: BookingId,

    /// Underlying [`domain::MoverBooking`].
    booking: OnceCell<domain::MoverBooking>,
}

impl From<domain::MoverBooking> for MoverBooking {
    fn from(booking: domain::MoverBooking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl MoverBooking {
    /// Creates a new [`MoverBooking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`MoverBooking`] with the provided ID exists,
    /// otherwise accessing this [`MoverBooking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<BookingId>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::MoverBooking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::MoverBooking`] doesn't exist.
    async fn order(
        &self,
        ctx: &Context,
    ) -> Result<&domain::MoverBooking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::mover_booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            BookingNotExistsError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Order of a relocation with a `Mover`.
#[graphql_object(context = Context)]
impl MoverBooking {
    /// Unique identifier of this `MoverBooking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Rental `Booking` this relocation is tied to, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        let booking_id = self.order(ctx).await?.booking_id;
        #[expect(
            unsafe_code,
            reason = "`MoverBooking` loaded from repository guarantees \
                      `Booking` existence"
        )]
        Ok(booking_id.map(|id| unsafe { api::Booking::new_unchecked(id) }))
    }

    /// `Mover` performing the relocation.
    ///
    /// `null` once the `Mover` has been deleted: the order itself outlives
    /// it.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.mover",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn mover(&self, ctx: &Context) -> Result<Option<Mover>, Error> {
        let mover_id = self.order(ctx).await?.mover_id;
        #[expect(
            unsafe_code,
            reason = "non-`NULL` `Mover` reference guarantees its existence"
        )]
        Ok(mover_id.map(|id| unsafe { Mover::new_unchecked(id) }))
    }

    /// `User` who ordered the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.tenant",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant(&self, ctx: &Context) -> Result<api::User, Error> {
        let tenant_id = self.order(ctx).await?.tenant_id;
        #[expect(
            unsafe_code,
            reason = "`MoverBooking` loaded from repository guarantees tenant \
                      existence"
        )]
        Ok(unsafe { api::User::new_unchecked(tenant_id) })
    }

    /// Pickup address of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.pickup",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn pickup(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.order(ctx).await?.pickup.clone().into())
    }

    /// Dropoff address of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.dropoff",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn dropoff(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.order(ctx)
            .await?
            .dropoff
            .clone()
            .into())
    }

    /// Distance of the relocation, in kilometers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.distanceKm",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn distance_km(&self, ctx: &Context) -> Result<f64, Error> {
        Ok(self.order(ctx)
            .await?
            .distance_km
            .into_inner()
            .to_f64()
            .unwrap_or_default())
    }

    /// Flat `Money` charged regardless of the distance.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.baseRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn base_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.base_rate)
    }

    /// `Money` charged per kilometer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.ratePerKm",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rate_per_km(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.rate_per_km)
    }

    /// Total `Money` of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.totalCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_cost(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.total_cost)
    }

    /// Average score of the `Mover` at the moment of quoting.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.ratingSnapshot",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating_snapshot(&self, ctx: &Context) -> Result<f64, Error> {
        Ok(self.order(ctx)
            .await?
            .rating_snapshot
            .to_f64()
            .unwrap_or_default())
    }

    /// Current status of this `MoverBooking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<BookingStatus, Error> {
        Ok(self.order(ctx).await?.status.into())
    }

    /// `DateTime` when this `MoverBooking` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.order(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `MoverBooking` was updated the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverBooking.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.order(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `MoverBooking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::mover_booking::Id)]
#[into(domain::mover_booking::Id)]
#[graphql(name = "MoverBookingId", transparent)]
pub struct BookingId(Uuid);

/// Status of a `MoverBooking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "MoverBookingStatus")]
pub enum BookingStatus {
    /// Waiting for the mover's decision.
    Pending,

    /// Accepted by the mover.
    Confirmed,

    /// Rejected by the mover.
    Rejected,

    /// Relocation has been performed.
    Completed,

    /// Cancelled by the tenant.
    Cancelled,
}

impl From<domain::mover_booking::Status> for BookingStatus {
    fn from(status: domain::mover_booking::Status) -> Self {
        use domain::mover_booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Rejected => Self::Rejected,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

/// Pickup or dropoff address of a relocation.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MoverAddress",
    with = scalar::Via::<domain::mover_booking::Address>,
)]
pub struct Address(domain::mover_booking::Address);

/// Transient quotation of a `MoverBooking`.
#[derive(Clone, Debug, From, Into)]
pub struct MoverQuote(domain::mover_booking::Quote);

/// Transient quotation of a `MoverBooking`.
///
/// Expires after a configured period unless confirmed.
#[graphql_object(context = Context)]
impl MoverQuote {
    /// Unique identifier of this `MoverQuote`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> QuoteId {
        self.0.id.into()
    }

    /// Rental `Booking` the relocation is tied to, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn booking(&self) -> Option<api::Booking> {
        #[expect(
            unsafe_code,
            reason = "`Booking` existence is checked on quoting"
        )]
        self.0
            .booking_id
            .map(|id| unsafe { api::Booking::new_unchecked(id) })
    }

    /// Quoted `Mover`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.mover",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn mover(&self) -> Mover {
        #[expect(
            unsafe_code,
            reason = "`Mover` existence is checked on quoting"
        )]
        unsafe {
            Mover::new_unchecked(self.0.mover_id)
        }
    }

    /// Pickup address of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.pickup",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn pickup(&self) -> Address {
        self.0.pickup.clone().into()
    }

    /// Dropoff address of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.dropoff",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn dropoff(&self) -> Address {
        self.0.dropoff.clone().into()
    }

    /// Distance of the relocation, in kilometers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.distanceKm",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn distance_km(&self) -> f64 {
        self.0.distance_km.into_inner().to_f64().unwrap_or_default()
    }

    /// Flat `Money` charged regardless of the distance.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.baseRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn base_rate(&self) -> Money {
        self.0.base_rate
    }

    /// `Money` charged per kilometer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.ratePerKm",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rate_per_km(&self) -> Money {
        self.0.rate_per_km
    }

    /// Total `Money` of the relocation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.totalCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total_cost(&self) -> Money {
        self.0.total_cost
    }

    /// Average score of the `Mover` at the moment of quoting.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.ratingSnapshot",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rating_snapshot(&self) -> f64 {
        self.0.rating_snapshot.to_f64().unwrap_or_default()
    }

    /// `DateTime` when this `MoverQuote` was issued.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MoverQuote.quotedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn quoted_at(&self) -> DateTime {
        self.0.quoted_at.coerce()
    }
}

/// Unique identifier of a `MoverQuote`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::mover_booking::QuoteId)]
#[into(domain::mover_booking::QuoteId)]
#[graphql(name = "MoverQuoteId", transparent)]
pub struct QuoteId(Uuid);

crate::define_error! {
    enum NotExistsError {
        #[code = "MOVER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Mover` with the specified ID does not exist"]
        NotExists,
    }
}

crate::define_error! {
    enum BookingNotExistsError {
        #[code = "MOVER_BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`MoverBooking` with the specified ID does not exist"]
        NotExists,
    }
}
