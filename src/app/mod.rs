//! Application core: domain data, port traits, and the monitor state machine.
//!
//! Nothing in this module touches hardware, files, or the network directly;
//! all I/O flows through the port traits in [`ports`], implemented by the
//! adapters in [`crate::adapters`] and [`crate::sensors`].

pub mod events;
pub mod ports;
pub mod service;
