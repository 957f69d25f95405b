//! # Ambimix Library
//!
//! Core of the ambient mixer: the sound catalog, a playback engine that keeps
//! any number of looping voices alive with independent levels and fades, the
//! mix state store that owns the active set and its derived "now playing"
//! projection, and the persisted settings record with its schema migrations.

pub mod catalog;
pub mod error;
pub mod mix;
pub mod playback;
pub mod probe;
pub mod settings;
mod tools;

#[cfg(test)]
mod test_support;

pub use error::MixerError;
