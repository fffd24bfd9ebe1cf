/// Collection endpoint for spots, relative to the API base URL
pub const SPOTS_PATH: &str = "/api/spots";

/// Storage prefix under which spot images are uploaded
pub const SPOT_IMAGES_PREFIX: &str = "spots";

/// Content type used when an image's type cannot be derived from its name
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// GEOLOCATION
// =============================================================================

/// Accept a cached position fix up to this age
pub const DEFAULT_GEO_MAXIMUM_AGE_MS: u64 = 10_000;

/// Wait at most this long for a fresh position fix
pub const DEFAULT_GEO_TIMEOUT_MS: u64 = 15_000;

/// Stuttgart city center
pub const DEFAULT_LONGITUDE: f64 = 9.1829;
pub const DEFAULT_LATITUDE: f64 = 48.7758;

// =============================================================================
// DISPLAY COLORS
// =============================================================================

pub const SEVERITY_LOW_COLOR: &str = "#FACC15";
pub const SEVERITY_MEDIUM_COLOR: &str = "#FB923C";
pub const SEVERITY_HIGH_COLOR: &str = "#F87171";
pub const SEVERITY_VERY_HIGH_COLOR: &str = "#C084FC";

pub const STATUS_ACTIVE_COLOR: &str = "#BBF7D0";
pub const STATUS_INACTIVE_COLOR: &str = "#FECACA";
pub const STATUS_PENDING_COLOR: &str = "#FEF08A";
