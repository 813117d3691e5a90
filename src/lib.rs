//! Pitchside - football lineup management
//!
//! The library holds the lineup engine and its collaborators; the
//! `pitchside` binary is a thin CLI over it.
//!
//! - [`lineup`] - players, slots, the builder and the drag/drop engine
//! - [`store`] - local lineup cache
//! - [`client`] - team backend
//! - [`session`] - cancellable team loading

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod lineup;
pub mod models;
pub mod output;
pub mod session;
pub mod store;

pub use error::{Error, Result};
