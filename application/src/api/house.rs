//! [`House`]-related definitions.

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

/// A rental property listing.
#[derive(Clone, Debug, From)]
pub struct House {
    /// ID of this [`House`].
    pub id: Id,

    /// Underlying [`domain::House`].
    house: OnceCell<domain::House>,
}

impl From<domain::House> for House {
    fn from(house: domain::House) -> Self {
        Self {
            id: house.id.into(),
            house: OnceCell::new_with(Some(house)),
        }
    }
}

impl House {
    /// Creates a new [`House`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`House`] with the provided ID exists,
    /// otherwise accessing this [`House`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            house: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::House`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::House`] doesn't exist.
    async fn house(&self, ctx: &Context) -> Result<&domain::House, Error> {
        let id = self.id.into();
        self.house
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::house::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|h| {
                        future::ready(
                            h.ok_or_else(|| NotExistsError::NotExists.into()),
                        )
                    })
            })
            .await
    }
}

/// A rental property listing.
#[graphql_object(context = Context)]
impl House {
    /// Unique identifier of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` who listed this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.landlord",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn landlord(&self, ctx: &Context) -> Result<api::User, Error> {
        let landlord_id = self.house(ctx).await?.landlord_id;
        #[expect(
            unsafe_code,
            reason = "`House` loaded from repository guarantees landlord \
                      existence"
        )]
        Ok(unsafe { api::User::new_unchecked(landlord_id) })
    }

    /// Title of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.house(ctx).await?.title.clone().into())
    }

    /// Description of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Description, Error> {
        Ok(self.house(ctx).await?.description.clone().into())
    }

    /// Category of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        Ok(self.house(ctx).await?.category.into())
    }

    /// Monthly rent of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.house(ctx).await?.price)
    }

    /// Number of rooms in a single unit of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.numRooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn num_rooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.house(ctx).await?.num_rooms.into())
    }

    /// Total number of bookable units in this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.totalUnits",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_units(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.house(ctx).await?.total_units.into())
    }

    /// Number of currently bookable units in this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.availableUnits",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn available_units(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.house(ctx).await?.available_units.into())
    }

    /// Indicator whether this `House` has any bookable units left.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.house(ctx).await?.is_available())
    }

    /// Location of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.house(ctx).await?.location.clone().into())
    }

    /// Latitude of this `House`, if geocoded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.latitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn latitude(&self, ctx: &Context) -> Result<Option<f64>, Error> {
        Ok(self.house(ctx).await?.latitude.and_then(|d| d.to_f64()))
    }

    /// Longitude of this `House`, if geocoded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.longitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn longitude(&self, ctx: &Context) -> Result<Option<f64>, Error> {
        Ok(self.house(ctx).await?.longitude.and_then(|d| d.to_f64()))
    }

    /// Amenities of this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(&self, ctx: &Context) -> Result<Vec<Amenity>, Error> {
        Ok(self
            .house(ctx)
            .await?
            .amenities
            .iter()
            .map(Into::into)
            .collect())
    }

    /// Contact phone of the landlord.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.contactPhone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contact_phone(
        &self,
        ctx: &Context,
    ) -> Result<api::user::Phone, Error> {
        Ok(self.house(ctx).await?.contact_phone.clone().into())
    }

    /// Contact e-mail of the landlord, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.contactEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contact_email(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Email>, Error> {
        Ok(self.house(ctx).await?.contact_email.clone().map(Into::into))
    }

    /// Images attached to this `House`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.images",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn images(&self, ctx: &Context) -> Result<Vec<Image>, Error> {
        ctx.service()
            .execute(query::house::Images::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|images| images.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `House` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.house(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `House` was updated the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "House.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.house(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `House`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::house::Id)]
#[into(domain::house::Id)]
#[graphql(name = "HouseId", transparent)]
pub struct Id(Uuid);

/// Title of a `House`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseTitle",
    with = scalar::Via::<domain::house::Title>,
)]
pub struct Title(domain::house::Title);

/// Description of a `House`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseDescription",
    with = scalar::Via::<domain::house::Description>,
)]
pub struct Description(domain::house::Description);

/// Location of a `House`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseLocation",
    with = scalar::Via::<domain::house::Location>,
)]
pub struct Location(domain::house::Location);

/// Category of a `House`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "HouseCategory")]
pub enum Category {
    /// Stand-alone house.
    Standalone,

    /// A hostel.
    Hostel,

    /// An apartment.
    Apartment,

    /// A shared room with a roommate.
    Roommate,
}

impl From<domain::house::Category> for Category {
    fn from(category: domain::house::Category) -> Self {
        use domain::house::Category as C;
        match category {
            C::Standalone => Self::Standalone,
            C::Hostel => Self::Hostel,
            C::Apartment => Self::Apartment,
            C::Roommate => Self::Roommate,
        }
    }
}

impl From<Category> for domain::house::Category {
    fn from(category: Category) -> Self {
        use Category as C;
        match category {
            C::Standalone => Self::Standalone,
            C::Hostel => Self::Hostel,
            C::Apartment => Self::Apartment,
            C::Roommate => Self::Roommate,
        }
    }
}

/// Single amenity of a `House`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "HouseAmenity")]
pub enum Amenity {
    /// WiFi.
    Wifi,

    /// Parking.
    Parking,

    /// Round-the-clock security.
    Security,

    /// Water supply.
    Water,

    /// Electricity.
    Electricity,

    /// Gym.
    Gym,

    /// Swimming pool.
    Pool,

    /// Laundry.
    Laundry,

    /// Furnished unit.
    Furnished,

    /// Air conditioning.
    Ac,

    /// Heating.
    Heating,

    /// Balcony.
    Balcony,
}

impl From<domain::house::Amenity> for Amenity {
    fn from(amenity: domain::house::Amenity) -> Self {
        use domain::house::Amenity as A;
        match amenity {
            A::Wifi => Self::Wifi,
            A::Parking => Self::Parking,
            A::Security => Self::Security,
            A::Water => Self::Water,
            A::Electricity => Self::Electricity,
            A::Gym => Self::Gym,
            A::Pool => Self::Pool,
            A::Laundry => Self::Laundry,
            A::Furnished => Self::Furnished,
            A::Ac => Self::Ac,
            A::Heating => Self::Heating,
            A::Balcony => Self::Balcony,
        }
    }
}

impl From<Amenity> for domain::house::Amenity {
    fn from(amenity: Amenity) -> Self {
        use Amenity as A;
        match amenity {
            A::Wifi => Self::Wifi,
            A::Parking => Self::Parking,
            A::Security => Self::Security,
            A::Water => Self::Water,
            A::Electricity => Self::Electricity,
            A::Gym => Self::Gym,
            A::Pool => Self::Pool,
            A::Laundry => Self::Laundry,
            A::Furnished => Self::Furnished,
            A::Ac => Self::Ac,
            A::Heating => Self::Heating,
            A::Balcony => Self::Balcony,
        }
    }
}

/// Image attached to a `House` listing.
#[derive(Clone, Debug, From, Into)]
pub struct Image(domain::house::Image);

/// Image attached to a `House` listing.
#[graphql_object(name = "HouseImage", context = Context)]
impl Image {
    /// Unique identifier of this `HouseImage`.
    #[must_use]
    pub fn id(&self) -> ImageId {
        self.0.id.into()
    }

    /// URL the image contents are stored under.
    #[must_use]
    pub fn url(&self) -> ImageUrl {
        self.0.url.clone().into()
    }

    /// Optional caption of this `HouseImage`.
    #[must_use]
    pub fn caption(&self) -> Option<Caption> {
        self.0.caption.clone().map(Into::into)
    }

    /// Indicator whether this `HouseImage` is the primary one.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.0.is_primary
    }

    /// `DateTime` when this `HouseImage` was uploaded.
    #[must_use]
    pub fn uploaded_at(&self) -> DateTime {
        self.0.uploaded_at.coerce()
    }
}

/// Unique identifier of a `HouseImage`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::house::ImageId)]
#[into(domain::house::ImageId)]
#[graphql(name = "HouseImageId", transparent)]
pub struct ImageId(Uuid);

/// URL of a `HouseImage`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseImageUrl",
    with = scalar::Via::<domain::house::ImageUrl>,
)]
pub struct ImageUrl(domain::house::ImageUrl);

/// Caption of a `HouseImage`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseImageCaption",
    with = scalar::Via::<domain::house::Caption>,
)]
pub struct Caption(domain::house::Caption);

/// Counts of listed `House`s per category.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct Stats(service::read::house::Stats);

/// Counts of listed `House`s per category.
#[graphql_object(name = "HouseStats", context = Context)]
impl Stats {
    /// Total number of listed `House`s.
    pub fn total(&self) -> Result<i32, Error> {
        self.0.total.try_into().map_err(AsError::into_error)
    }

    /// Number of stand-alone `House`s.
    pub fn standalone(&self) -> Result<i32, Error> {
        self.0.standalone.try_into().map_err(AsError::into_error)
    }

    /// Number of hostels.
    pub fn hostels(&self) -> Result<i32, Error> {
        self.0.hostels.try_into().map_err(AsError::into_error)
    }

    /// Number of apartments.
    pub fn apartments(&self) -> Result<i32, Error> {
        self.0.apartments.try_into().map_err(AsError::into_error)
    }

    /// Number of roommate listings.
    pub fn roommates(&self) -> Result<i32, Error> {
        self.0.roommates.try_into().map_err(AsError::into_error)
    }
}

crate::define_error! {
    enum NotExistsError {
        #[code = "HOUSE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`House` with the specified ID does not exist"]
        NotExists,
    }
}
