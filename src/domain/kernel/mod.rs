// ============================================================================
// Shared Kernel - Value objects used by more than one aggregate
// ============================================================================

pub mod location;

pub use location::{Location, LocationError, MAX_COORDINATE, MIN_COORDINATE};
