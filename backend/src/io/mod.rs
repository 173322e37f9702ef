//! # IO Module
//!
//! Interface layer between a user interface and the domain logic.
//!
//! Translates HTTP requests into overview actions and formats the resulting
//! snapshots as the DTOs defined in the `shared` crate. No business rules live
//! here.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum for async HTTP handling
//! - **Serialization**: Serde for JSON serialization/deserialization
//! - **State Management**: Axum extractors for dependency injection
//! - **Error Handling**: `{ "error": ... }` bodies with matching status codes

pub mod rest;

pub use rest::*;
