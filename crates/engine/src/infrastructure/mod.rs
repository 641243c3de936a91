//! Infrastructure: port traits and the concrete adapters the engine owns.

pub mod clock;
pub mod ports;
pub mod region_locks;
