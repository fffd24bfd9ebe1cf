//! Storage module for spot images
//!
//! Provides an S3-compatible storage client for uploads and download URL
//! resolution.

mod minio_client;

pub use minio_client::{MinIOClient, ObjectStorage};
