mod identity_toolkit_client;

pub use identity_toolkit_client::{auth_error_message, IdentityProvider, IdentityToolkitClient};
