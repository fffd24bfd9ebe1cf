//! Backend REST API client for spot records

mod spot_api_client;

pub use spot_api_client::{accepted_voting, AccessTokenProvider, SpotApi, SpotApiClient};
