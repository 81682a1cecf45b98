use serde_json::Value;

use crate::model::WeatherReport;

/// Map a raw OpenWeather payload onto a [`WeatherReport`].
///
/// Never fails: a missing path or a value of an unexpected type becomes `None`.
pub fn normalize(raw: Value) -> WeatherReport {
    let main_field = |key: &str| raw.pointer(&format!("/main/{key}")).and_then(Value::as_f64);

    WeatherReport {
        city: string_at(&raw, "/name"),
        country: string_at(&raw, "/sys/country"),
        temperature: main_field("temp"),
        feels_like: main_field("feels_like"),
        temp_min: main_field("temp_min"),
        temp_max: main_field("temp_max"),
        pressure: main_field("pressure"),
        humidity: main_field("humidity"),
        // only the first condition is reported
        description: string_at(&raw, "/weather/0/description"),
        wind_speed: raw.pointer("/wind/speed").and_then(Value::as_f64),
        raw,
    }
}

fn string_at(raw: &Value, pointer: &str) -> Option<String> {
    raw.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_documented_fields() {
        let raw = json!({
            "name": "Algiers",
            "sys": {"country": "DZ"},
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 25, "feels_like": 24, "humidity": 30, "pressure": 1012},
            "wind": {"speed": 3.4}
        });

        let report = normalize(raw.clone());

        assert_eq!(report.city.as_deref(), Some("Algiers"));
        assert_eq!(report.country.as_deref(), Some("DZ"));
        assert_eq!(report.temperature, Some(25.0));
        assert_eq!(report.feels_like, Some(24.0));
        assert_eq!(report.humidity, Some(30.0));
        assert_eq!(report.pressure, Some(1012.0));
        assert_eq!(report.description.as_deref(), Some("clear sky"));
        assert_eq!(report.wind_speed, Some(3.4));
        assert_eq!(report.temp_min, None);
        assert_eq!(report.temp_max, None);
        assert_eq!(report.raw, raw);
    }

    #[test]
    fn empty_weather_list_gives_no_description() {
        let report = normalize(json!({"name": "Oslo", "weather": []}));
        assert_eq!(report.city.as_deref(), Some("Oslo"));
        assert_eq!(report.description, None);
    }

    #[test]
    fn only_first_condition_is_used() {
        let report = normalize(json!({
            "weather": [{"description": "mist"}, {"description": "rain"}]
        }));
        assert_eq!(report.description.as_deref(), Some("mist"));
    }

    #[test]
    fn missing_or_foreign_shapes_do_not_fault() {
        for raw in [
            json!({}),
            json!(null),
            json!([1, 2, 3]),
            json!({"main": "hot", "sys": [], "wind": {"speed": "fast"}, "weather": {}}),
        ] {
            let report = normalize(raw.clone());
            assert_eq!(report.city, None);
            assert_eq!(report.temperature, None);
            assert_eq!(report.wind_speed, None);
            assert_eq!(report.description, None);
            assert_eq!(report.raw, raw);
        }
    }
}
