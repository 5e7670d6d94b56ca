//! Shared test fixtures for seatplan crates.
//!
//! This crate provides data builders and canned problems for testing.
//! It depends only on `seatplan-core` so every other crate can use it as a
//! dev-dependency without cycles.
//!
//! - [`people`] - guest, table, relationship and constraint builders
//! - [`wedding`] - a mid-sized reception problem with groups and rules
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! seatplan-test = { workspace = true }
//! ```
//!
//! ```
//! use seatplan_test::people::{guests, tables};
//!
//! let guests = guests(6);
//! let tables = tables(2, 4);
//! assert_eq!(guests[0].id.as_str(), "g0");
//! assert_eq!(tables[1].id.as_str(), "t1");
//! ```

pub mod people;
pub mod wedding;

pub use people::{
    assignment, avoid, constraint, friend, grouped, guest, guests, relationship, tables,
};
pub use wedding::wedding;
