// Private module declarations
mod problem;
mod server;

// Re-export for public API
pub use problem::{status_for, Problem};
pub use server::{configure, start_api_server, ApiState, CourierDto, Created, LocationDto, OrderDto};
