//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for the spots API, object storage and
//! device geolocation.

pub mod api;
pub mod geolocation;
pub mod storage;
