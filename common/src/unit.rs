//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity update.
#[derive(Clone, Copy, Debug)]
pub struct Update;

/// Marker type describing an activation.
#[derive(Clone, Copy, Debug)]
pub struct Activation;

/// Marker type describing an upload.
#[derive(Clone, Copy, Debug)]
pub struct Upload;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a move-in.
#[derive(Clone, Copy, Debug)]
pub struct MoveIn;
