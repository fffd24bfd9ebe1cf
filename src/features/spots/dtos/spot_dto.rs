use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::features::spots::models::{
    Coordinates, FeatureKind, PointGeometry, SpotProperties, SpotSeverity, SpotStatus, SpotType,
};
use crate::shared::constants::FALLBACK_CONTENT_TYPE;

/// Where the bytes of a locally captured image live
#[derive(Debug, Clone)]
pub enum AssetSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// A locally captured image attached to a draft
#[derive(Debug, Clone)]
pub struct ImageAsset {
    filename: String,
    content_type: String,
    source: AssetSource,
}

impl ImageAsset {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            content_type: content_type_from_filename(&filename).to_string(),
            filename,
            source: AssetSource::File(path),
        }
    }

    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        Self {
            content_type: content_type_from_filename(&filename).to_string(),
            filename,
            source: AssetSource::Memory(data),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Load the binary content of the asset
    pub async fn read(&self) -> Result<Vec<u8>> {
        match &self.source {
            AssetSource::Memory(data) => Ok(data.clone()),
            AssetSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                AppError::Upload(format!("Failed to read image '{}': {}", path.display(), e))
            }),
        }
    }
}

/// Spot form as filled in by the user, before submission
#[derive(Debug, Clone, Default)]
pub struct SpotDraft {
    pub spot_type: Option<SpotType>,
    pub severity: Option<SpotSeverity>,
    pub comment: Option<String>,
    pub images: Vec<ImageAsset>,
}

impl SpotDraft {
    /// Check the required fields in order, stopping at the first missing one
    pub fn validate_required(&self) -> Result<(SpotType, SpotSeverity)> {
        let spot_type = self
            .spot_type
            .ok_or_else(|| AppError::Validation("type required".to_string()))?;

        let severity = self
            .severity
            .ok_or_else(|| AppError::Validation("severity required".to_string()))?;

        Ok((spot_type, severity))
    }

    /// Comment with surrounding whitespace removed, `None` when blank
    pub fn normalized_comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
    }
}

/// Body of `POST /api/spots`: a GeoJSON Feature without id
#[derive(Debug, Clone, Serialize)]
pub struct CreateSpotRequest {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: PointGeometry,
    pub properties: SpotProperties,
}

impl CreateSpotRequest {
    pub fn new(
        location: Coordinates,
        spot_type: SpotType,
        severity: SpotSeverity,
        comment: Option<String>,
        images: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry: location.into(),
            properties: SpotProperties {
                id: None,
                spot_type,
                severity,
                comment,
                images,
                voting: 0,
                status: SpotStatus::Pending,
                validated: false,
                created_at: Some(now),
                updated_at: Some(now),
            },
        }
    }
}

/// Body of `PATCH /api/spots/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVotingDto {
    pub voting: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

impl std::str::FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(format!("vote direction must be 'up' or 'down', got '{}'", other)),
        }
    }
}

/// Get content type from an image filename's extension
pub fn content_type_from_filename(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_missing_type_fails_first() {
        let draft = SpotDraft::default();
        let err = assert_err!(draft.validate_required());
        assert!(matches!(err, AppError::Validation(msg) if msg == "type required"));
    }

    #[test]
    fn test_missing_severity_fails_after_type() {
        let draft = SpotDraft {
            spot_type: Some(SpotType::Uneven),
            ..Default::default()
        };
        let err = assert_err!(draft.validate_required());
        assert!(matches!(err, AppError::Validation(msg) if msg == "severity required"));
    }

    #[test]
    fn test_complete_draft_is_valid() {
        let draft = SpotDraft {
            spot_type: Some(SpotType::Danger),
            severity: Some(SpotSeverity::High),
            ..Default::default()
        };
        let (spot_type, severity) = assert_ok!(draft.validate_required());
        assert_eq!(spot_type, SpotType::Danger);
        assert_eq!(severity, SpotSeverity::High);
    }

    #[test]
    fn test_normalized_comment() {
        let mut draft = SpotDraft {
            comment: Some("  pothole ".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.normalized_comment().as_deref(), Some("pothole"));

        draft.comment = Some("   ".to_string());
        assert_eq!(draft.normalized_comment(), None);
    }

    #[test]
    fn test_create_request_shape() {
        let now = Utc::now();
        let request = CreateSpotRequest::new(
            Coordinates::new(9.18, 48.78),
            SpotType::Danger,
            SpotSeverity::High,
            Some("pothole".to_string()),
            vec![],
            now,
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["type"], "Feature");
        assert!(value.get("id").is_none());
        assert_eq!(value["geometry"]["coordinates"][0], 9.18);
        assert_eq!(value["properties"]["voting"], 0);
        assert_eq!(value["properties"]["status"], "pending");
        assert_eq!(value["properties"]["validated"], false);
        assert_eq!(value["properties"]["images"], serde_json::json!([]));
        assert_eq!(
            value["properties"]["createdAt"],
            value["properties"]["updatedAt"]
        );
    }

    #[test]
    fn test_image_asset_from_path() {
        let asset = ImageAsset::from_path("/tmp/captures/IMG_1.JPG");
        assert_eq!(asset.filename(), "IMG_1.JPG");
        assert_eq!(asset.content_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_file_is_upload_error() {
        let asset = ImageAsset::from_path("/definitely/not/here.png");
        let err = asset.read().await.unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
    }

    #[test]
    fn test_vote_direction() {
        assert_eq!(VoteDirection::Up.delta(), 1);
        assert_eq!(VoteDirection::Down.delta(), -1);
        assert_eq!("DOWN".parse::<VoteDirection>().unwrap(), VoteDirection::Down);
        assert!("sideways".parse::<VoteDirection>().is_err());
    }

    #[test]
    fn test_content_type_from_filename() {
        assert_eq!(content_type_from_filename("a.png"), "image/png");
        assert_eq!(content_type_from_filename("a.webp"), "image/webp");
        assert_eq!(content_type_from_filename("noext"), FALLBACK_CONTENT_TYPE);
    }
}
