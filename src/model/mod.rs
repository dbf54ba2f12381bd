//! Object model: databases, schemas, tables and their components

mod column;
mod database;
mod objects;
mod table;
mod types;

pub use column::*;
pub use database::*;
pub use objects::*;
pub use table::*;
pub use types::*;
