//! Client core for reporting sidewalk obstacles ("spots").
//!
//! Loads the shared spot collection, submits new spots with photos, votes on
//! existing ones and keeps an email/password session.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
