//! # Domain Models
//!
//! Pure configuration types, constants and the slice registry contract.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
