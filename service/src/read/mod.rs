//! Read entities definitions.

pub mod booking;
pub mod house;
pub mod mover;
pub mod mover_booking;
