//! [`House`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use itertools::Itertools as _;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contact, user};

/// Rental property listed by a landlord.
#[derive(Clone, Debug)]
pub struct House {
    /// ID of this [`House`].
    pub id: Id,

    /// ID of the [`user::User`] who listed this [`House`].
    pub landlord_id: user::Id,

    /// [`Title`] of this [`House`].
    pub title: Title,

    /// [`Description`] of this [`House`].
    pub description: Description,

    /// [`Category`] of this [`House`].
    pub category: Category,

    /// Monthly rent of this [`House`].
    pub price: Money,

    /// Number of rooms in a single unit of this [`House`].
    pub num_rooms: NumRooms,

    /// Total number of bookable units in this [`House`].
    pub total_units: Units,

    /// Number of currently bookable units in this [`House`].
    pub available_units: Units,

    /// [`Location`] of this [`House`].
    pub location: Location,

    /// Latitude of this [`House`], if geocoded.
    pub latitude: Option<Decimal>,

    /// Longitude of this [`House`], if geocoded.
    pub longitude: Option<Decimal>,

    /// [`Amenities`] of this [`House`].
    pub amenities: Amenities,

    /// Contact [`contact::Phone`] of the landlord.
    pub contact_phone: contact::Phone,

    /// Contact [`contact::Email`] of the landlord, if provided.
    pub contact_email: Option<contact::Email>,

    /// [`DateTime`] when this [`House`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`House`] was updated the last time.
    pub updated_at: UpdateDateTime,
}

impl House {
    /// Indicates whether this [`House`] has any bookable units left.
    ///
    /// Derived from [`House::available_units`] on every read, never stored
    /// on its own.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available_units > 0
    }

    /// Adds the provided `delta` to the [`House::available_units`], clamping
    /// the result to `[0, total_units]`.
    pub fn adjust_available(&mut self, delta: i32) {
        let adjusted = i64::from(self.available_units) + i64::from(delta);
        self.available_units = Units::try_from(
            adjusted.clamp(0, i64::from(self.total_units)),
        )
        .unwrap_or(self.total_units);
    }

    /// Resizes the [`House::total_units`] to the provided `new_total`,
    /// shifting [`House::available_units`] by the same difference.
    ///
    /// This is an approximation rather than a unit-by-unit reconciliation:
    /// when units are already partially booked, shrinking and re-growing the
    /// total may free more (or fewer) units than were actually unbooked.
    pub fn resize_total(&mut self, new_total: Units) {
        let diff = i64::from(new_total) - i64::from(self.total_units);
        self.total_units = new_total;
        let adjusted = i64::from(self.available_units) + diff;
        self.available_units =
            Units::try_from(adjusted.clamp(0, i64::from(new_total)))
                .unwrap_or(new_total);
    }
}

/// ID of a [`House`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`House`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 200
    }
}

impl std::str::FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`House`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 5000
    }
}

impl std::str::FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Location (address or area) of a [`House`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 200
    }
}

impl std::str::FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Number of rooms in a [`House`] unit.
pub type NumRooms = u16;

/// Count of bookable units in a [`House`].
pub type Units = u16;

define_kind! {
    #[doc = "Category of a [`House`]."]
    enum Category {
        #[doc = "Stand-alone house."]
        Standalone = 1,

        #[doc = "A hostel."]
        Hostel = 2,

        #[doc = "An apartment."]
        Apartment = 3,

        #[doc = "A shared room with a roommate."]
        Roommate = 4,
    }
}

define_kind! {
    #[doc = "Single amenity of a [`House`]."]
    enum Amenity {
        #[doc = "WiFi."]
        Wifi = 1,

        #[doc = "Parking."]
        Parking = 2,

        #[doc = "Round-the-clock security."]
        Security = 3,

        #[doc = "Water supply."]
        Water = 4,

        #[doc = "Electricity."]
        Electricity = 5,

        #[doc = "Gym."]
        Gym = 6,

        #[doc = "Swimming pool."]
        Pool = 7,

        #[doc = "Laundry."]
        Laundry = 8,

        #[doc = "Furnished unit."]
        Furnished = 9,

        #[doc = "Air conditioning."]
        Ac = 10,

        #[doc = "Heating."]
        Heating = 11,

        #[doc = "Balcony."]
        Balcony = 12,
    }
}

/// Set of [`Amenity`]s of a [`House`].
///
/// Persisted as a comma-separated string.
#[derive(Clone, Debug, Default, Eq, From, Into, PartialEq)]
pub struct Amenities(Vec<Amenity>);

impl Amenities {
    /// Creates a new empty [`Amenities`] set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the [`Amenity`]s of this set.
    pub fn iter(&self) -> impl Iterator<Item = Amenity> + '_ {
        self.0.iter().copied()
    }

    /// Indicates whether this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Amenities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format(","))
    }
}

impl std::str::FromStr for Amenities {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(|a| a.trim().parse().map_err(|_| "invalid `Amenity`"))
            .collect::<Result<Vec<_>, _>>()
            .map(|mut list| {
                list.dedup();
                Self(list)
            })
    }
}

/// Image attached to a [`House`] listing.
#[derive(Clone, Debug)]
pub struct Image {
    /// ID of this [`Image`].
    pub id: ImageId,

    /// ID of the [`House`] this [`Image`] belongs to.
    pub house_id: Id,

    /// URL the image contents are stored under.
    pub url: ImageUrl,

    /// Optional caption of this [`Image`].
    pub caption: Option<Caption>,

    /// Indicator whether this [`Image`] is the primary one of its [`House`].
    pub is_primary: bool,

    /// [`DateTime`] when this [`Image`] was uploaded.
    pub uploaded_at: UploadDateTime,
}

/// ID of an [`Image`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct ImageId(Uuid);

impl ImageId {
    /// Creates a new random [`ImageId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// URL of an [`Image`].
///
/// The image contents themselves live in external storage; only the
/// reference is kept here.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        (!url.trim().is_empty() && url.len() <= 2000).then_some(Self(url))
    }
}

impl std::str::FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Caption of an [`Image`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Caption(String);

impl Caption {
    /// Creates a new [`Caption`] if the given `caption` is valid.
    #[must_use]
    pub fn new(caption: impl Into<String>) -> Option<Self> {
        let caption = caption.into();
        (!caption.trim().is_empty() && caption.len() <= 200)
            .then_some(Self(caption))
    }
}

impl std::str::FromStr for Caption {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Caption`")
    }
}

/// [`DateTime`] when a [`House`] was created.
pub type CreationDateTime = DateTimeOf<(House, unit::Creation)>;

/// [`DateTime`] when a [`House`] was updated the last time.
pub type UpdateDateTime = DateTimeOf<(House, unit::Update)>;

/// [`DateTime`] when an [`Image`] was uploaded.
pub type UploadDateTime = DateTimeOf<(Image, unit::Upload)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, DateTime, Money};

    use crate::domain::{contact, user};

    use super::{Amenities, Category, House, Title};

    fn house(total: u16, available: u16) -> House {
        House {
            id: super::Id::new(),
            landlord_id: user::Id::new(),
            title: Title::new("Sunrise Hostel").unwrap(),
            description: super::Description::new("Near campus").unwrap(),
            category: Category::Hostel,
            price: Money {
                amount: "8000".parse().unwrap(),
                currency: Currency::Kes,
            },
            num_rooms: 1,
            total_units: total,
            available_units: available,
            location: super::Location::new("Juja").unwrap(),
            latitude: None,
            longitude: None,
            amenities: Amenities::new(),
            contact_phone: contact::Phone::new("+254712345678").unwrap(),
            contact_email: None,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn availability_is_derived_from_units() {
        assert!(house(3, 1).is_available());
        assert!(!house(3, 0).is_available());
    }

    #[test]
    fn adjust_available_clamps_to_bounds() {
        let mut h = house(3, 0);
        h.adjust_available(-1);
        assert_eq!(h.available_units, 0);

        h.adjust_available(5);
        assert_eq!(h.available_units, 3);

        h.adjust_available(-1);
        assert_eq!(h.available_units, 2);
    }

    #[test]
    fn resize_total_shifts_available_by_diff() {
        let mut h = house(3, 1);
        h.resize_total(5);
        assert_eq!((h.total_units, h.available_units), (5, 3));

        h.resize_total(1);
        assert_eq!((h.total_units, h.available_units), (1, 0));
    }

    #[test]
    fn amenities_roundtrip_comma_separated() {
        let parsed = Amenities::from_str("WIFI,PARKING,WATER").unwrap();
        assert_eq!(parsed.to_string(), "WIFI,PARKING,WATER");
        assert!(Amenities::from_str("").unwrap().is_empty());
        assert!(Amenities::from_str("JACUZZI").is_err());
    }
}
