//! Entity model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO where inserts take caller input
//!
//! Rust field names are English; the on-disk columns keep their original
//! names and are bridged with `AS` aliases in each repository's column
//! list.

pub mod category;
pub mod image;
pub mod overview;
pub mod product;
pub mod stock;
pub mod user;
