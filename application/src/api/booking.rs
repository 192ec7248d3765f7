//! [`Booking`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A tenant's request to rent a unit of a `House`.
#[derive(Clone, Debug, From)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(&self, ctx: &Context) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(
                            b.ok_or_else(|| NotExistsError::NotExists.into()),
                        )
                    })
            })
            .await
    }
}

/// A tenant's request to rent a unit of a `House`.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` who placed this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.tenant",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant(&self, ctx: &Context) -> Result<api::User, Error> {
        let tenant_id = self.booking(ctx).await?.tenant_id;
        #[expect(
            unsafe_code,
            reason = "`Booking` loaded from repository guarantees tenant \
                      existence"
        )]
        Ok(unsafe { api::User::new_unchecked(tenant_id) })
    }

    /// `House` this `Booking` is for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.house",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn house(&self, ctx: &Context) -> Result<api::House, Error> {
        let house_id = self.booking(ctx).await?.house_id;
        #[expect(
            unsafe_code,
            reason = "`Booking` loaded from repository guarantees `House` \
                      existence"
        )]
        Ok(unsafe { api::House::new_unchecked(house_id) })
    }

    /// `DateTime` the tenant intends to move in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.moveInAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn move_in_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.move_in_at.coerce())
    }

    /// Lease duration of this `Booking`, in months.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.leaseMonths",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn lease_months(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.booking(ctx).await?.lease_months.into())
    }

    /// Name of the tenant, as entered on the `Booking` form.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.tenantName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant_name(&self, ctx: &Context) -> Result<TenantName, Error> {
        Ok(self.booking(ctx).await?.tenant_name.clone().into())
    }

    /// Contact phone of the tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.tenantPhone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant_phone(
        &self,
        ctx: &Context,
    ) -> Result<api::user::Phone, Error> {
        Ok(self.booking(ctx).await?.tenant_phone.clone().into())
    }

    /// Contact e-mail of the tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.tenantEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant_email(
        &self,
        ctx: &Context,
    ) -> Result<api::user::Email, Error> {
        Ok(self.booking(ctx).await?.tenant_email.clone().into())
    }

    /// Message of the tenant to the landlord.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.message",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn message(&self, ctx: &Context) -> Result<Message, Error> {
        Ok(self.booking(ctx).await?.message.clone().into())
    }

    /// Current status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.into())
    }

    /// `DateTime` when this `Booking` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Booking` was updated the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Booking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Name of a tenant, as entered on the `Booking` form.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BookingTenantName",
    with = scalar::Via::<domain::booking::TenantName>,
)]
pub struct TenantName(domain::booking::TenantName);

/// Message of a tenant to the landlord.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BookingMessage",
    with = scalar::Via::<domain::booking::Message>,
)]
pub struct Message(domain::booking::Message);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Waiting for the landlord's decision.
    Pending,

    /// Approved by the landlord.
    Approved,

    /// Rejected by the landlord.
    Rejected,

    /// Cancelled by the tenant.
    Cancelled,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
            S::Cancelled => Self::Cancelled,
        }
    }
}

/// Counts of a `User`'s `Booking`s per status.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct StatusCounts(service::read::booking::StatusCounts);

/// Counts of a `User`'s `Booking`s per status.
#[graphql_object(name = "BookingStatusCounts", context = Context)]
impl StatusCounts {
    /// Number of pending `Booking`s.
    pub fn pending(&self) -> Result<i32, Error> {
        self.0.pending.try_into().map_err(AsError::into_error)
    }

    /// Number of approved `Booking`s.
    pub fn approved(&self) -> Result<i32, Error> {
        self.0.approved.try_into().map_err(AsError::into_error)
    }

    /// Number of rejected `Booking`s.
    pub fn rejected(&self) -> Result<i32, Error> {
        self.0.rejected.try_into().map_err(AsError::into_error)
    }

    /// Number of cancelled `Booking`s.
    pub fn cancelled(&self) -> Result<i32, Error> {
        self.0.cancelled.try_into().map_err(AsError::into_error)
    }
}

crate::define_error! {
    enum NotExistsError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}
