mod auth_dto;

pub use auth_dto::CredentialsDto;
pub(crate) use auth_dto::{
    IdentityErrorResponse, PasswordAuthRequest, PasswordAuthResponse, RefreshTokenResponse,
};
