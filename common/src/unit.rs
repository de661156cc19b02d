//! Marker types describing entity lifecycle events.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity (soft) deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;
