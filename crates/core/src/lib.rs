//! Domain logic for the magazzino inventory backend.
//!
//! Pure types and functions only: size schemes and their label ordering,
//! color label handling, quantity validation, and the error taxonomy.
//! No database, no async, no I/O.

pub mod error;
pub mod labels;
pub mod sizes;
pub mod stock;
pub mod types;
