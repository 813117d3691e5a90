//! Backend data models
//!
//! Records exchanged with the REST persistence backend.

mod team;

pub use team::Team;
