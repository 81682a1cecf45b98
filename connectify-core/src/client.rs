//! OpenWeather clients.
//!
//! [`OpenWeather`] blocks the calling thread, [`AsyncOpenWeather`] is awaited inside a
//! [`Session`]. Both validate input and build the query here, then hand it to their
//! transport and pass the payload through [`normalize`](crate::normalize::normalize).

use crate::{
    error::{ConnectifyError, Result},
    model::{QueryParams, Units},
};

pub mod blocking;
pub mod nonblocking;

pub use blocking::OpenWeather;
pub use nonblocking::{AsyncOpenWeather, Session};

pub(crate) fn city_params(city: &str, units: Units, lang: &str, api_key: &str) -> Result<QueryParams> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ConnectifyError::new("city parameter is required"));
    }

    Ok(with_common(vec![("q", city.to_string())], units, lang, api_key))
}

pub(crate) fn coords_params(
    lat: f64,
    lon: f64,
    units: Units,
    lang: &str,
    api_key: &str,
) -> Result<QueryParams> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(ConnectifyError::new("lat and lon are required"));
    }

    Ok(with_common(
        vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        units,
        lang,
        api_key,
    ))
}

fn with_common(mut params: QueryParams, units: Units, lang: &str, api_key: &str) -> QueryParams {
    params.push(("units", units.as_str().to_string()));
    params.push(("lang", lang.to_string()));
    params.push(("appid", api_key.to_string()));
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_query_has_all_keys_in_order() {
        let params = city_params("Algiers", Units::Imperial, "fr", "KEY").unwrap();
        assert_eq!(
            params,
            vec![
                ("q", "Algiers".to_string()),
                ("units", "imperial".to_string()),
                ("lang", "fr".to_string()),
                ("appid", "KEY".to_string()),
            ]
        );
    }

    #[test]
    fn blank_city_is_rejected() {
        for city in ["", "   "] {
            let err = city_params(city, Units::Metric, "en", "KEY").unwrap_err();
            assert_eq!(err.to_string(), "city parameter is required");
        }
    }

    #[test]
    fn coords_query_carries_lat_lon() {
        let params = coords_params(36.75, 3.06, Units::Metric, "en", "KEY").unwrap();
        assert_eq!(params[0], ("lat", "36.75".to_string()));
        assert_eq!(params[1], ("lon", "3.06".to_string()));
        assert_eq!(params.last().unwrap(), &("appid", "KEY".to_string()));
    }

    #[test]
    fn non_finite_coords_are_rejected() {
        let err = coords_params(f64::NAN, 3.0, Units::Metric, "en", "KEY").unwrap_err();
        assert_eq!(err.to_string(), "lat and lon are required");
        assert!(coords_params(1.0, f64::INFINITY, Units::Metric, "en", "KEY").is_err());
    }
}
