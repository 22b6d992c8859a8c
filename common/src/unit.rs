//! Marker types distinguishing timestamps of the same entity.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing a moment something is expected to be given back.
#[derive(Clone, Copy, Debug)]
pub struct PlannedReturn;

/// Marker type describing a moment something was actually given back.
#[derive(Clone, Copy, Debug)]
pub struct ActualReturn;
