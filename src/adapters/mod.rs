//! Driven adapters: implementations of the port traits that touch files,
//! sockets, and the wall clock.

pub mod clock;
pub mod journal;
pub mod log_sink;
pub mod provisioning;
pub mod uplink;
