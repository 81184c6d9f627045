//! SillGuard monitor library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. Hardware access is confined to the sysfs-backed adapters in
//! [`sensors`]; everything else is host-portable.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod retry;

pub mod adapters;
pub mod sensors;
