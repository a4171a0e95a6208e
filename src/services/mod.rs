//! Host services behind the engine.
//!
//! ARCHITECTURE
//! ============
//! The engine never touches storage. These modules own the stores, the
//! background writer, and the file and clipboard intake, so `state` only
//! has to route engine actions to them.

pub mod clipboard;
pub mod persistence;
pub mod repository;
pub mod settings;
pub mod transfer;
