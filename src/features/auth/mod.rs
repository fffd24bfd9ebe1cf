pub mod clients;
pub mod dtos;
pub mod model;
pub mod services;

pub use clients::{IdentityProvider, IdentityToolkitClient};
pub use services::SessionService;
