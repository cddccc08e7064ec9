// Service exports
pub mod nominatim;
pub mod weather;

pub use nominatim::{NominatimClient, NominatimError};
pub use weather::StaticWeatherProvider;
