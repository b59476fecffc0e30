//! # aqari-core
//!
//! Core types, traits, configuration, and error handling for the Aqari bot.

pub mod config;
pub mod digits;
pub mod error;
pub mod message;
pub mod model;
pub mod templates;
pub mod traits;
