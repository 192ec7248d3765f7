//! GraphQL API definitions.

pub mod booking;
pub mod house;
pub mod mover;
mod mutation;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    booking::Booking,
    house::House,
    mover::{Mover, MoverBooking, MoverQuote},
    mutation::Mutation,
    query::Query,
    user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
