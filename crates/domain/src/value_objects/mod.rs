//! Value Objects - Immutable, identity-less domain primitives

mod city_descriptor;
mod date_range;
mod geo_location;

pub use city_descriptor::{CityDescriptor, MAX_CITY_NAME_LEN};
pub use date_range::DateRange;
pub use geo_location::{GeoLocation, InvalidCoordinates};
