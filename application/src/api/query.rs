//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::user::NotExistsError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `House` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HOUSE_NOT_EXISTS` - the `House` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "house",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn house(
        id: api::house::Id,
        ctx: &Context,
    ) -> Result<api::House, Error> {
        ctx.service()
            .execute(query::house::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::house::NotExistsError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the filtered list of `House`s.
    ///
    /// All the filters are combined with `AND`; no filters select every
    /// `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "houses",
            landlord_id = ?landlord_id.as_ref().map(ToString::to_string),
            location = ?location,
            only_available = ?only_available,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn houses(
        landlord_id: Option<api::user::Id>,
        category: Option<api::house::Category>,
        location: Option<String>,
        only_available: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::House>, Error> {
        ctx.service()
            .execute(query::houses::List::by(read::house::Filter {
                landlord_id: landlord_id.map(Into::into),
                category: category.map(Into::into),
                location,
                only_available: only_available.unwrap_or_default(),
            }))
            .await
            .map(|houses| houses.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the most recently listed `House`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "recentHouses",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn recent_houses(
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::House>, Error> {
        ctx.service()
            .execute(query::houses::Recent::by(
                limit.map_or_else(Default::default, Into::into),
            ))
            .await
            .map(|houses| houses.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the per-category counts of listed `House`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "houseStats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn house_stats(ctx: &Context) -> Result<api::house::Stats, Error> {
        ctx.service()
            .execute(query::houses::Stats::by(()))
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// Only the tenant who placed the `Booking` and the landlord of the
    /// booked `House` may see it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `NOT_PARTICIPANT` - the current `User` is neither the tenant nor
    ///                       the landlord of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let booking = ctx
            .service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::booking::NotExistsError::NotExists.into())
            .map_err(ctx.error())?;

        if api::user::Id::from(booking.tenant_id) != my_id {
            let house = ctx
                .service()
                .execute(query::house::ById::by(booking.house_id))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?
                .ok_or_else(|| api::house::NotExistsError::NotExists.into())
                .map_err(ctx.error())?;
            if api::user::Id::from(house.landlord_id) != my_id {
                return Err(ctx.error()(AccessError::NotParticipant.into()));
            }
        }

        Ok(booking.into())
    }

    /// Returns the `Booking`s placed by the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myBookings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_bookings(ctx: &Context) -> Result<Vec<api::Booking>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::bookings::List::by(read::booking::Filter {
                tenant_id: Some(my_id.into()),
                ..read::booking::Filter::default()
            }))
            .await
            .map(|bookings| bookings.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Booking`s on the `House`s of the currently authenticated
    /// `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "landlordBookings",
            house_id = ?house_id.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn landlord_bookings(
        house_id: Option<api::house::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::bookings::List::by(read::booking::Filter {
                landlord_id: Some(my_id.into()),
                house_id: house_id.map(Into::into),
                ..read::booking::Filter::default()
            }))
            .await
            .map(|bookings| bookings.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the per-status `Booking` counts of the currently authenticated
    /// `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookingStatusCounts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking_status_counts(
        ctx: &Context,
    ) -> Result<api::booking::StatusCounts, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::bookings::StatusCounts::by(my_id.into()))
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Mover` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_NOT_EXISTS` - the `Mover` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "mover",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mover(
        id: api::mover::Id,
        ctx: &Context,
    ) -> Result<api::Mover, Error> {
        ctx.service()
            .execute(query::mover::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::mover::NotExistsError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the filtered list of `Mover`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "movers",
            provides_cleaning = ?provides_cleaning,
            otel.name = Self::SPAN_NAME,
            query = ?query,
        ),
    )]
    pub async fn movers(
        query: Option<String>,
        provides_cleaning: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Mover>, Error> {
        ctx.service()
            .execute(query::movers::List::by(read::mover::Filter {
                query,
                provides_cleaning,
                ..read::mover::Filter::default()
            }))
            .await
            .map(|movers| movers.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Mover`s owned by the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myMoverServices",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_mover_services(
        ctx: &Context,
    ) -> Result<Vec<api::Mover>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::movers::List::by(read::mover::Filter {
                owner_id: Some(my_id.into()),
                ..read::mover::Filter::default()
            }))
            .await
            .map(|movers| movers.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `MoverBooking`s ordered by the currently authenticated
    /// `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myMoverBookings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_mover_bookings(
        ctx: &Context,
    ) -> Result<Vec<api::MoverBooking>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::mover_bookings::List::by(
                read::mover_booking::Filter {
                    tenant_id: Some(my_id.into()),
                    ..read::mover_booking::Filter::default()
                },
            ))
            .await
            .map(|bookings| bookings.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `MoverBooking`s of the `Mover`s owned by the currently
    /// authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "moverOrders",
            mover_id = ?mover_id.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mover_orders(
        mover_id: Option<api::mover::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::MoverBooking>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::mover_bookings::List::by(
                read::mover_booking::Filter {
                    owner_id: Some(my_id.into()),
                    mover_id: mover_id.map(Into::into),
                    ..read::mover_booking::Filter::default()
                },
            ))
            .await
            .map(|bookings| bookings.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

define_error! {
    enum AccessError {
        #[code = "NOT_PARTICIPANT"]
        #[status = FORBIDDEN]
        #[message = "Current `User` is not a participant of this `Booking`"]
        NotParticipant,
    }
}
