// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Aggregates and the one cross-aggregate algorithm:
// - kernel: value objects shared by several aggregates (Location)
// - order: Order aggregate and its status lifecycle
// - courier: Courier aggregate with its storage places and movement
// - services: DispatchService (order -> nearest suitable courier)
//
// Nothing in here knows about storage, scheduling or event delivery.
//
// ============================================================================

pub mod kernel;
pub mod order;
pub mod courier;
pub mod services;
