//! Entity definitions shared by both storage engines.
//!
//! Each entity is a sea-orm model that also serializes to the public JSON shape,
//! so the file engine and the HTTP layer reuse the same struct.

pub mod errors;
pub mod base;
pub mod db;
pub mod state;
pub mod city;
