//! Service layer providing business-oriented CRUD operations on top of storage.
//! - Separates request rules (whitelists, ownership) from persistence.
//! - Reuses entity definitions in the `models` crate.
//! - Storage engines live behind the [`storage::Storage`] trait.

pub mod errors;
pub mod payload;
pub mod runtime;
pub mod storage;
pub mod state_service;
pub mod city_service;
