mod spot_dto;

pub use spot_dto::{
    content_type_from_filename, AssetSource, CreateSpotRequest, ImageAsset, SpotDraft,
    UpdateVotingDto, VoteDirection,
};
