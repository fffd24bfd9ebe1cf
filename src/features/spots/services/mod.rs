mod spot_store;
mod submission_service;
mod voting_service;

pub use spot_store::SpotStore;
pub use submission_service::SubmissionService;
pub use voting_service::VotingService;
