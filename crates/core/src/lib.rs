//! Domain types and pure logic for the construction site management client.
//!
//! This crate does no I/O. It holds the record and form types for every
//! entity, their validation rules, and the computations the screens need:
//! the attendance grid, the site financial summary, table filtering and
//! pagination, optimistic list updates and the password confirmation gate.

pub mod attendance_grid;
pub mod error;
pub mod finance;
pub mod format;
pub mod models;
pub mod optimistic;
pub mod password_gate;
pub mod roles;
pub mod table;
pub mod types;
pub mod validation;
