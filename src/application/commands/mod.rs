// ============================================================================
// Command Handlers - state-changing use cases
// ============================================================================

pub mod create_order;
pub mod create_courier;
pub mod add_storage_place;
pub mod assign_order;
pub mod move_couriers;

pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use create_courier::{CreateCourierCommand, CreateCourierHandler};
pub use add_storage_place::{AddStoragePlaceCommand, AddStoragePlaceHandler};
pub use assign_order::{AssignOrderHandler, Assignment};
pub use move_couriers::{MoveCouriersHandler, MoveReport};
