//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` entity structs matching database rows
//! - `Deserialize` request DTOs for the endpoints operating on them

pub mod attendance;
pub mod classroom;
pub mod student;
pub mod student_result;
pub mod subject;
pub mod user;
