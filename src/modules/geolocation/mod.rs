//! Device geolocation with a staleness tolerance and a bounded wait

mod locator;

pub use locator::{Geolocator, PositionSource, StaticPositionSource};
