//! Domain definitions.

pub mod booking;
pub mod contact;
pub mod house;
pub mod mover;
pub mod mover_booking;
pub mod user;

pub use self::{
    booking::Booking,
    house::House,
    mover::{Rating as MoverRating, Service as MoverService},
    mover_booking::{MoverBooking, Quote},
    user::User,
};
