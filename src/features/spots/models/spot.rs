use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of obstacle a spot reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotType {
    Construction,
    Uneven,
    Narrow,
    Danger,
}

impl std::fmt::Display for SpotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotType::Construction => write!(f, "construction"),
            SpotType::Uneven => write!(f, "uneven"),
            SpotType::Narrow => write!(f, "narrow"),
            SpotType::Danger => write!(f, "danger"),
        }
    }
}

impl std::str::FromStr for SpotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "construction" => Ok(SpotType::Construction),
            "uneven" => Ok(SpotType::Uneven),
            "narrow" => Ok(SpotType::Narrow),
            "danger" => Ok(SpotType::Danger),
            other => Err(format!("unknown spot type '{}'", other)),
        }
    }
}

/// Severity ordinal, 1 (low) to 4 (very high). Integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpotSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    VeryHigh = 4,
}

impl TryFrom<u8> for SpotSeverity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SpotSeverity::Low),
            2 => Ok(SpotSeverity::Medium),
            3 => Ok(SpotSeverity::High),
            4 => Ok(SpotSeverity::VeryHigh),
            other => Err(format!("severity must be between 1 and 4, got {}", other)),
        }
    }
}

impl From<SpotSeverity> for u8 {
    fn from(severity: SpotSeverity) -> Self {
        severity as u8
    }
}

impl std::fmt::Display for SpotSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Moderation status, owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    #[default]
    Pending,
    Active,
    Inactive,
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotStatus::Pending => write!(f, "pending"),
            SpotStatus::Active => write!(f, "active"),
            SpotStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Longitude/latitude pair, serialized as a GeoJSON position `[lon, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
}

/// GeoJSON point geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Coordinates,
}

impl From<Coordinates> for PointGeometry {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates,
        }
    }
}

/// Feature properties as exchanged with the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotProperties {
    #[serde(default, alias = "_id", skip_serializing)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub spot_type: SpotType,
    pub severity: SpotSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub voting: i64,
    #[serde(default)]
    pub status: SpotStatus,
    #[serde(default)]
    pub validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of a persisted spot: a GeoJSON Feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotFeature {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: PointGeometry,
    pub properties: SpotProperties,
}

/// A persisted spot. Always carries its backend-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpotFeature", into = "SpotFeature")]
pub struct Spot {
    pub id: String,
    pub location: Coordinates,
    pub spot_type: SpotType,
    pub severity: SpotSeverity,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub voting: i64,
    pub status: SpotStatus,
    pub validated: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<SpotFeature> for Spot {
    type Error = String;

    fn try_from(feature: SpotFeature) -> Result<Self, Self::Error> {
        let SpotFeature {
            id,
            geometry,
            properties,
            ..
        } = feature;

        let id = id
            .or(properties.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "spot record has no id".to_string())?;

        Ok(Spot {
            id,
            location: geometry.coordinates,
            spot_type: properties.spot_type,
            severity: properties.severity,
            comment: properties.comment,
            images: properties.images,
            voting: properties.voting,
            status: properties.status,
            validated: properties.validated,
            created_at: properties.created_at,
            updated_at: properties.updated_at,
        })
    }
}

impl From<Spot> for SpotFeature {
    fn from(spot: Spot) -> Self {
        SpotFeature {
            id: Some(spot.id),
            kind: FeatureKind::Feature,
            geometry: spot.location.into(),
            properties: SpotProperties {
                id: None,
                spot_type: spot.spot_type,
                severity: spot.severity,
                comment: spot.comment,
                images: spot.images,
                voting: spot.voting,
                status: spot.status,
                validated: spot.validated,
                created_at: spot.created_at,
                updated_at: spot.updated_at,
            },
        }
    }
}
