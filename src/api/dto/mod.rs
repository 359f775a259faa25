//! Data Transfer Objects for REST request/response serialization.
//!
//! Field casing is pinned to the dashboard protocol: `piId`, `newStock`,
//! and `deviceSynced` stay camelCase on the wire.

pub mod auth_dto;
pub mod control_dto;
pub mod inventory_dto;

pub use auth_dto::*;
pub use control_dto::*;
pub use inventory_dto::*;
