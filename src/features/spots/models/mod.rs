mod spot;

pub use spot::{
    Coordinates, FeatureKind, GeometryKind, PointGeometry, Spot, SpotFeature, SpotProperties,
    SpotSeverity, SpotStatus, SpotType,
};
