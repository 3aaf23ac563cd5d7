//! Port traits at the boundary between domain logic and the outside world.

pub mod catalog_port;
pub mod config_port;
pub mod exchange_port;
pub mod report_port;
