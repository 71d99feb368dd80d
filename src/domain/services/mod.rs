// ============================================================================
// Domain Services - logic spanning more than one aggregate
// ============================================================================

pub mod dispatch;

pub use dispatch::{DispatchError, DispatchService};
