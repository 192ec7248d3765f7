//! [`Command`] definition.

pub mod approve_booking;
pub mod approve_mover_booking;
pub mod attach_house_image;
pub mod authorize_user_session;
pub mod cancel_booking;
pub mod cancel_mover_booking;
pub mod confirm_mover_booking;
pub mod create_booking;
pub mod create_house;
pub mod create_mover_service;
pub mod create_user;
pub mod create_user_session;
pub mod delete_house;
pub mod delete_mover_service;
pub mod quote_mover_booking;
pub mod reject_booking;
pub mod reject_mover_booking;
pub mod submit_mover_rating;
pub mod update_house;
pub mod update_mover_service;
pub mod verify_email;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_booking::ApproveBooking,
    approve_mover_booking::ApproveMoverBooking,
    attach_house_image::AttachHouseImage,
    authorize_user_session::AuthorizeUserSession,
    cancel_booking::CancelBooking,
    cancel_mover_booking::CancelMoverBooking,
    confirm_mover_booking::ConfirmMoverBooking,
    create_booking::CreateBooking, create_house::CreateHouse,
    create_mover_service::CreateMoverService, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_house::DeleteHouse,
    delete_mover_service::DeleteMoverService,
    quote_mover_booking::QuoteMoverBooking, reject_booking::RejectBooking,
    reject_mover_booking::RejectMoverBooking,
    submit_mover_rating::SubmitMoverRating, update_house::UpdateHouse,
    update_mover_service::UpdateMoverService, verify_email::VerifyEmail,
};
