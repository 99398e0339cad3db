//! Shared data models for the VGen dashboard backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scenes and their externally hosted media links
//! - Media slot identifiers used in refresh diagnostics

pub mod scene;

pub use scene::{MediaSlot, Scene};
