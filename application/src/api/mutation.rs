//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money};
use juniper::graphql_object;
use rust_decimal::Decimal;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a `User` with the provided `Email` (or re-sends the magic
    /// link if the `User` exists already) and dispatches a magic link to it.
    ///
    /// Always returns `true`, regardless of whether the `Email` was known
    /// before.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAIL_NOT_DISPATCHED` - the magic link could not be sent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = %email,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user(
        email: api::user::Email,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::CreateUser {
                email: email.into(),
            })
            .await
            .map(|()| true)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Verifies a magic link token, activating the `User` and opening a new
    /// `UserSession`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_MAGIC_LINK` - the magic link is malformed, expired, or
    ///                          refers to an unknown `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "verifyEmail",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn verify_email(
        token: api::user::MagicLinkToken,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::VerifyEmail {
                token: token.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Lists a new `House` owned by the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PRICE` - the provided price is not a valid monthly rent;
    /// - `NO_UNITS` - the `House` must have at least 1 unit;
    /// - `INVALID_COORDINATE` - a provided coordinate is not a finite number;
    /// - `VALUE_OUT_OF_RANGE` - a provided number does not fit its bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "createHouse",
            otel.name = Self::SPAN_NAME,
            title = %title,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "all are parameters")]
    pub async fn create_house(
        title: api::house::Title,
        description: api::house::Description,
        category: api::house::Category,
        price: Money,
        num_rooms: i32,
        total_units: i32,
        location: api::house::Location,
        latitude: Option<f64>,
        longitude: Option<f64>,
        amenities: Option<Vec<api::house::Amenity>>,
        contact_phone: api::user::Phone,
        contact_email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::House, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateHouse {
                landlord_id: my_id.into(),
                title: title.into(),
                description: description.into(),
                category: category.into(),
                price,
                num_rooms: into_u16(num_rooms).map_err(ctx.error())?,
                total_units: into_u16(total_units).map_err(ctx.error())?,
                location: location.into(),
                latitude: latitude
                    .map(into_coordinate)
                    .transpose()
                    .map_err(ctx.error())?,
                longitude: longitude
                    .map(into_coordinate)
                    .transpose()
                    .map_err(ctx.error())?,
                amenities: amenities
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect::<Vec<_>>()
                    .into(),
                contact_phone: contact_phone.into(),
                contact_email: contact_email.map(Into::into),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Updates the specified `House` of the currently authenticated `User`.
    ///
    /// Omitted arguments are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HOUSE_NOT_EXISTS` - the `House` does not exist or is not owned by
    ///                        the current `User`;
    /// - `INVALID_PRICE` - the provided price is not a valid monthly rent;
    /// - `NO_UNITS` - the `House` must have at least 1 unit;
    /// - `INVALID_COORDINATE` - a provided coordinate is not a finite number;
    /// - `VALUE_OUT_OF_RANGE` - a provided number does not fit its bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateHouse",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "all are parameters")]
    pub async fn update_house(
        id: api::house::Id,
        title: Option<api::house::Title>,
        description: Option<api::house::Description>,
        category: Option<api::house::Category>,
        price: Option<Money>,
        num_rooms: Option<i32>,
        total_units: Option<i32>,
        location: Option<api::house::Location>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        amenities: Option<Vec<api::house::Amenity>>,
        contact_phone: Option<api::user::Phone>,
        contact_email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::House, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateHouse {
                landlord_id: my_id.into(),
                house_id: id.into(),
                title: title.map(Into::into),
                description: description.map(Into::into),
                category: category.map(Into::into),
                price,
                num_rooms: num_rooms
                    .map(into_u16)
                    .transpose()
                    .map_err(ctx.error())?,
                total_units: total_units
                    .map(into_u16)
                    .transpose()
                    .map_err(ctx.error())?,
                location: location.map(Into::into),
                latitude: latitude
                    .map(|v| into_coordinate(v).map(Some))
                    .transpose()
                    .map_err(ctx.error())?,
                longitude: longitude
                    .map(|v| into_coordinate(v).map(Some))
                    .transpose()
                    .map_err(ctx.error())?,
                amenities: amenities.map(|list| {
                    list.into_iter()
                        .map(Into::into)
                        .collect::<Vec<_>>()
                        .into()
                }),
                contact_phone: contact_phone.map(Into::into),
                contact_email: contact_email.map(|e| Some(e.into())),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Deletes the specified `House` of the currently authenticated `User`,
    /// along with its `Booking`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HOUSE_NOT_EXISTS` - the `House` does not exist or is not owned by
    ///                        the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteHouse",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_house(
        id: api::house::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteHouse {
                landlord_id: my_id.into(),
                house_id: id.into(),
            })
            .await
            .map(|()| true)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Attaches an image to the specified `House` of the currently
    /// authenticated `User`.
    ///
    /// A primary image demotes the previous primary one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HOUSE_NOT_EXISTS` - the `House` does not exist or is not owned by
    ///                        the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "attachHouseImage",
            house_id = %house_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn attach_house_image(
        house_id: api::house::Id,
        url: api::house::ImageUrl,
        caption: Option<api::house::Caption>,
        is_primary: Option<bool>,
        ctx: &Context,
    ) -> Result<api::house::Image, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AttachHouseImage {
                landlord_id: my_id.into(),
                house_id: house_id.into(),
                url: url.into(),
                caption: caption.map(Into::into),
                is_primary: is_primary.unwrap_or_default(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Places a `Booking` on the specified `House` by the currently
    /// authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HOUSE_ALREADY_BOOKED` - the current `User` already holds a
    ///                            `Booking` on this `House`;
    /// - `HOUSE_NOT_EXISTS` - the `House` does not exist;
    /// - `INVALID_LEASE` - the lease duration is out of bounds;
    /// - `NO_UNITS_AVAILABLE` - the `House` has no vacant units left;
    /// - `OWN_HOUSE` - the current `User` is the landlord of this `House`;
    /// - `VALUE_OUT_OF_RANGE` - a provided number does not fit its bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createBooking",
            house_id = %house_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "all are parameters")]
    pub async fn create_booking(
        house_id: api::house::Id,
        move_in_at: DateTime,
        lease_months: i32,
        tenant_name: api::booking::TenantName,
        tenant_phone: api::user::Phone,
        tenant_email: api::user::Email,
        message: Option<api::booking::Message>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateBooking {
                tenant_id: my_id.into(),
                house_id: house_id.into(),
                move_in_at: move_in_at.coerce(),
                lease_months: into_u16(lease_months).map_err(ctx.error())?,
                tenant_name: tenant_name.into(),
                tenant_phone: tenant_phone.into(),
                tenant_email: tenant_email.into(),
                message: message.map(Into::into).unwrap_or_default(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Approves the specified `Booking` as the landlord of the booked
    /// `House`, claiming one of its units.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist or is not on a
    ///                          `House` of the current `User`;
    /// - `INVALID_BOOKING_STATUS` - the `Booking` cannot be approved in its
    ///                              current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "approveBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::ApproveBooking {
                landlord_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Rejects the specified `Booking` as the landlord of the booked `House`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist or is not on a
    ///                          `House` of the current `User`;
    /// - `INVALID_BOOKING_STATUS` - the `Booking` cannot be rejected in its
    ///                              current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rejectBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RejectBooking {
                landlord_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Cancels the specified `Booking` of the currently authenticated `User`,
    /// releasing its unit if the `Booking` was approved.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist or was not
    ///                          placed by the current `User`;
    /// - `INVALID_BOOKING_STATUS` - the `Booking` cannot be cancelled in its
    ///                              current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CancelBooking {
                tenant_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Registers a new `Mover` owned by the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RATE` - the provided per-kilometer rate is not valid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createMoverService",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_mover_service(
        name: api::mover::Name,
        description: api::mover::Description,
        rate_per_km: Money,
        provides_cleaning: Option<bool>,
        contact_phone: api::user::Phone,
        contact_email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::Mover, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateMoverService {
                owner_id: my_id.into(),
                name: name.into(),
                description: description.into(),
                rate_per_km,
                provides_cleaning: provides_cleaning.unwrap_or_default(),
                contact_phone: contact_phone.into(),
                contact_email: contact_email.map(Into::into),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Updates the specified `Mover` of the currently authenticated `User`.
    ///
    /// Omitted arguments are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_NOT_EXISTS` - the `Mover` does not exist or is not owned by
    ///                        the current `User`;
    /// - `INVALID_RATE` - the provided per-kilometer rate is not valid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateMoverService",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_mover_service(
        id: api::mover::Id,
        name: Option<api::mover::Name>,
        description: Option<api::mover::Description>,
        rate_per_km: Option<Money>,
        provides_cleaning: Option<bool>,
        contact_phone: Option<api::user::Phone>,
        contact_email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::Mover, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateMoverService {
                owner_id: my_id.into(),
                service_id: id.into(),
                name: name.map(Into::into),
                description: description.map(Into::into),
                rate_per_km,
                provides_cleaning,
                contact_phone: contact_phone.map(Into::into),
                contact_email: contact_email.map(|e| Some(e.into())),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Deletes the specified `Mover` of the currently authenticated `User`.
    ///
    /// Existing `MoverBooking`s outlive the `Mover` with their `Mover`
    /// reference detached.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_NOT_EXISTS` - the `Mover` does not exist or is not owned by
    ///                        the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteMoverService",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_mover_service(
        id: api::mover::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteMoverService {
                owner_id: my_id.into(),
                service_id: id.into(),
            })
            .await
            .map(|()| true)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Rates the specified `Mover` on behalf of the currently authenticated
    /// `User`.
    ///
    /// Submitting again replaces the previous `MoverRating` of the same
    /// `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_NOT_EXISTS` - the `Mover` does not exist;
    /// - `OWN_MOVER_SERVICE` - the current `User` owns this `Mover`;
    /// - `INVALID_SCORE` - the score is out of 1..=5 bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "submitMoverRating",
            mover_id = %mover_id,
            otel.name = Self::SPAN_NAME,
            score = %score,
        ),
    )]
    pub async fn submit_mover_rating(
        mover_id: api::mover::Id,
        score: i32,
        comment: Option<api::mover::Comment>,
        ctx: &Context,
    ) -> Result<api::mover::Rating, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SubmitMoverRating {
                user_id: my_id.into(),
                service_id: mover_id.into(),
                score: into_score(score).map_err(ctx.error())?,
                comment: comment.map(Into::into),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Quotes a relocation with the specified `Mover` for the currently
    /// authenticated `User`.
    ///
    /// The returned `MoverQuote` is transient: it expires after a configured
    /// period unless confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_NOT_EXISTS` - the `Mover` does not exist;
    /// - `BOOKING_NOT_EXISTS` - the referenced `Booking` does not exist or
    ///                          was not placed by the current `User`;
    /// - `PRICE_OVERFLOW` - the quoted price does not fit into `Money`;
    /// - `INVALID_DISTANCE` - the distance is not a positive finite number.
    #[tracing::instrument(
        skip_all,
        fields(
            distance_km = %distance_km,
            gql.name = "quoteMoverBooking",
            mover_id = %mover_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote_mover_booking(
        mover_id: api::mover::Id,
        booking_id: Option<api::booking::Id>,
        pickup: api::mover::Address,
        dropoff: api::mover::Address,
        distance_km: f64,
        ctx: &Context,
    ) -> Result<api::MoverQuote, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::QuoteMoverBooking {
                tenant_id: my_id.into(),
                mover_id: mover_id.into(),
                booking_id: booking_id.map(Into::into),
                pickup: pickup.into(),
                dropoff: dropoff.into(),
                distance_km: into_distance(distance_km)
                    .map_err(ctx.error())?,
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Confirms the specified `MoverQuote` of the currently authenticated
    /// `User`, persisting it as a pending `MoverBooking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `MoverQuote` does not exist, expired, or
    ///                        was issued to another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "confirmMoverBooking",
            otel.name = Self::SPAN_NAME,
            quote_id = %quote_id,
        ),
    )]
    pub async fn confirm_mover_booking(
        quote_id: api::mover::QuoteId,
        ctx: &Context,
    ) -> Result<api::MoverBooking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::ConfirmMoverBooking {
                tenant_id: my_id.into(),
                quote_id: quote_id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Confirms the specified `MoverBooking` as the owner of its `Mover`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_BOOKING_NOT_EXISTS` - the `MoverBooking` does not exist or
    ///                                is not on a `Mover` of the current
    ///                                `User`;
    /// - `INVALID_MOVER_BOOKING_STATUS` - the `MoverBooking` cannot be
    ///                                    confirmed in its current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "approveMoverBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_mover_booking(
        id: api::mover::BookingId,
        ctx: &Context,
    ) -> Result<api::MoverBooking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::ApproveMoverBooking {
                owner_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Rejects the specified `MoverBooking` as the owner of its `Mover`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_BOOKING_NOT_EXISTS` - the `MoverBooking` does not exist or
    ///                                is not on a `Mover` of the current
    ///                                `User`;
    /// - `INVALID_MOVER_BOOKING_STATUS` - the `MoverBooking` cannot be
    ///                                    rejected in its current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rejectMoverBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_mover_booking(
        id: api::mover::BookingId,
        ctx: &Context,
    ) -> Result<api::MoverBooking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RejectMoverBooking {
                owner_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Cancels the specified `MoverBooking` of the currently authenticated
    /// `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MOVER_BOOKING_NOT_EXISTS` - the `MoverBooking` does not exist or
    ///                                was not ordered by the current `User`;
    /// - `INVALID_MOVER_BOOKING_STATUS` - the `MoverBooking` cannot be
    ///                                    cancelled in its current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelMoverBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_mover_booking(
        id: api::mover::BookingId,
        ctx: &Context,
    ) -> Result<api::MoverBooking, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CancelMoverBooking {
                tenant_id: my_id.into(),
                booking_id: id.into(),
            })
            .await
            .map(Into::into)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// Converts a user-provided [`i32`] into a [`u16`].
fn into_u16(value: i32) -> Result<u16, Error> {
    value
        .try_into()
        .map_err(|_| InputError::OutOfRange.into())
}

/// Converts a user-provided [`f64`] coordinate into a [`Decimal`].
fn into_coordinate(value: f64) -> Result<Decimal, Error> {
    Decimal::from_f64_retain(value)
        .ok_or_else(|| InputError::InvalidCoordinate.into())
}

/// Converts a user-provided [`f64`] into a [`Distance`].
///
/// [`Distance`]: domain::mover_booking::Distance
fn into_distance(value: f64) -> Result<domain::mover_booking::Distance, Error> {
    Decimal::from_f64_retain(value)
        .and_then(domain::mover_booking::Distance::new)
        .ok_or_else(|| InputError::InvalidDistance.into())
}

/// Converts a user-provided [`i32`] into a [`Score`].
///
/// [`Score`]: domain::mover::Score
fn into_score(value: i32) -> Result<domain::mover::Score, Error> {
    u8::try_from(value)
        .ok()
        .and_then(domain::mover::Score::new)
        .ok_or_else(|| InputError::InvalidScore.into())
}

define_error! {
    enum InputError {
        #[code = "INVALID_COORDINATE"]
        #[status = BAD_REQUEST]
        #[message = "Provided coordinate is not a finite number"]
        InvalidCoordinate,

        #[code = "INVALID_DISTANCE"]
        #[status = BAD_REQUEST]
        #[message = "Provided distance is not a positive finite number"]
        InvalidDistance,

        #[code = "INVALID_SCORE"]
        #[status = BAD_REQUEST]
        #[message = "Provided score is out of 1..=5 bounds"]
        InvalidScore,

        #[code = "VALUE_OUT_OF_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Provided number does not fit its bounds"]
        OutOfRange,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MAIL_NOT_DISPATCHED"]
                #[status = SERVICE_UNAVAILABLE]
                #[message = "Magic link could not be sent"]
                MailNotDispatched,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::Mail(_) => Some(Error::MailNotDispatched.into()),
        }
    }
}

impl AsError for command::verify_email::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_MAGIC_LINK"]
                #[status = BAD_REQUEST]
                #[message = "Magic link is malformed, expired, or refers to \
                             an unknown `User`"]
                InvalidMagicLink,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) | Self::UserNotExists(_) => {
                Some(Error::InvalidMagicLink.into())
            }
            Self::Session(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USER_NOT_ACTIVATED"]
                #[status = FORBIDDEN]
                #[message = "`User` has not verified its `Email` yet"]
                UserNotActivated,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) | Self::UserNotExists(_) => None,
            Self::UserNotActivated(_) => Some(Error::UserNotActivated.into()),
        }
    }
}

impl AsError for command::create_house::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "Provided price is not a valid monthly rent"]
                InvalidPrice,

                #[code = "NO_UNITS"]
                #[status = BAD_REQUEST]
                #[message = "`House` must have at least 1 unit"]
                NoUnits,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidPrice(_) => Some(Error::InvalidPrice.into()),
            Self::NoUnits => Some(Error::NoUnits.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::update_house::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "Provided price is not a valid monthly rent"]
                InvalidPrice,

                #[code = "NO_UNITS"]
                #[status = BAD_REQUEST]
                #[message = "`House` must have at least 1 unit"]
                NoUnits,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HouseNotExists(_) => {
                api::house::NotExistsError::NotExists.into()
            }
            Self::InvalidPrice(_) => Error::InvalidPrice.into(),
            Self::NoUnits => Error::NoUnits.into(),
        })
    }
}

impl AsError for command::delete_house::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HouseNotExists(_) => {
                api::house::NotExistsError::NotExists.into()
            }
        })
    }
}

impl AsError for command::attach_house_image::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HouseNotExists(_) => {
                api::house::NotExistsError::NotExists.into()
            }
        })
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "HOUSE_ALREADY_BOOKED"]
                #[status = CONFLICT]
                #[message = "Current `User` already holds a `Booking` on \
                             this `House`"]
                AlreadyBooked,

                #[code = "INVALID_LEASE"]
                #[status = BAD_REQUEST]
                #[message = "Lease duration is out of bounds"]
                InvalidLease,

                #[code = "NO_UNITS_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "`House` has no vacant units left"]
                NoUnitsAvailable,

                #[code = "OWN_HOUSE"]
                #[status = FORBIDDEN]
                #[message = "Landlord cannot book its own `House`"]
                OwnHouse,
            }
        }

        Some(match self {
            Self::AlreadyBooked(_) => Error::AlreadyBooked.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::HouseNotExists(_) => {
                api::house::NotExistsError::NotExists.into()
            }
            Self::InvalidLease => Error::InvalidLease.into(),
            Self::NoUnitsAvailable(_) => Error::NoUnitsAvailable.into(),
            Self::OwnHouse(_) => Error::OwnHouse.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::approve_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingNotExists(_) => {
                api::booking::NotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatus(_) => {
                BookingStatusError::InvalidStatus.into()
            }
        })
    }
}

impl AsError for command::reject_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingNotExists(_) => {
                api::booking::NotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatus(_) => {
                BookingStatusError::InvalidStatus.into()
            }
        })
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingNotExists(_) => {
                api::booking::NotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatus(_) => {
                BookingStatusError::InvalidStatus.into()
            }
        })
    }
}

define_error! {
    enum BookingStatusError {
        #[code = "INVALID_BOOKING_STATUS"]
        #[status = CONFLICT]
        #[message = "`Booking` cannot be transitioned from its current \
                     status"]
        InvalidStatus,
    }
}

impl AsError for command::create_mover_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidRate(_) => Some(RateError::InvalidRate.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::update_mover_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidRate(_) => RateError::InvalidRate.into(),
            Self::ServiceNotExists(_) => {
                api::mover::NotExistsError::NotExists.into()
            }
        })
    }
}

impl AsError for command::delete_mover_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => {
                api::mover::NotExistsError::NotExists.into()
            }
        })
    }
}

define_error! {
    enum RateError {
        #[code = "INVALID_RATE"]
        #[status = BAD_REQUEST]
        #[message = "Provided per-kilometer rate is not valid"]
        InvalidRate,
    }
}

impl AsError for command::submit_mover_rating::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OWN_MOVER_SERVICE"]
                #[status = FORBIDDEN]
                #[message = "Owner cannot rate its own `Mover`"]
                OwnService,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::OwnService(_) => Error::OwnService.into(),
            Self::ServiceNotExists(_) => {
                api::mover::NotExistsError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::quote_mover_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PRICE_OVERFLOW"]
                #[status = BAD_REQUEST]
                #[message = "Quoted price does not fit into `Money`"]
                PriceOverflow,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => {
                api::booking::NotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::PriceOverflow => Error::PriceOverflow.into(),
            Self::ServiceNotExists(_) => {
                api::mover::NotExistsError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::confirm_mover_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "QUOTE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`MoverQuote` with the specified ID does not \
                             exist or expired"]
                QuoteNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::QuoteNotExists(_) => Some(Error::QuoteNotExists.into()),
        }
    }
}

impl AsError for command::approve_mover_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingNotExists(_) => {
                api::mover::BookingNotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatus(_) => {
                MoverBookingStatusError::InvalidStatus.into()
            }
        })
    }
}

impl AsError for command::cancel_mover_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingNotExists(_) => {
                api::mover::BookingNotExistsError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatus(_) => {
                MoverBookingStatusError::InvalidStatus.into()
            }
        })
    }
}

define_error! {
    enum MoverBookingStatusError {
        #[code = "INVALID_MOVER_BOOKING_STATUS"]
        #[status = CONFLICT]
        #[message = "`MoverBooking` cannot be transitioned from its current \
                     status"]
        InvalidStatus,
    }
}
