//! Per-feed parsing strategies.
//!
//! Each upstream feed has its own idiosyncratic wire format: plain JSON,
//! delimiter-separated text, marker-phrase sentences, or JSON wrapped in a
//! JavaScript variable assignment. One pure function per feed converts the
//! raw payload into a structured record or a [`ParseError`].

use thiserror::Error;

use crate::model::{
    Forecast, Lang, LocalWeather, RainfallNowcast, RainfallWindow, UvReport, WarningSummary,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is not the expected JSON shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected at least {expected} delimited fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("marker {marker:?} not found in payload")]
    MissingMarker { marker: &'static str },
}

/// Grid-cell weather is JSON-shaped text with nested temperature, humidity
/// and wind groups.
pub fn local_weather(raw: &str) -> Result<LocalWeather, ParseError> {
    Ok(serde_json::from_str(raw)?)
}

/// The rainfall nowcast is a flat string using `@` and `#` as field
/// delimiters. Twelve positional fields: times at even indices 0-8 chain
/// the four 30-minute windows (values at odd indices 1-7), and the three
/// locale descriptions sit at indices 9-11.
pub fn rainfall_nowcast(raw: &str) -> Result<RainfallNowcast, ParseError> {
    let fields: Vec<&str> = raw.split(['@', '#']).collect();
    if fields.len() < 12 {
        return Err(ParseError::FieldCount { expected: 12, found: fields.len() });
    }

    let window = |from: usize, value: usize, to: usize| RainfallWindow {
        from_time: fields[from].to_string(),
        to_time: fields[to].to_string(),
        value: fields[value].to_string(),
    };

    Ok(RainfallNowcast {
        windows: [window(0, 1, 2), window(2, 3, 4), window(4, 5, 6), window(6, 7, 8)],
        description_en: fields[9].to_string(),
        description_tc: fields[10].to_string(),
        description_sc: fields[11].to_string(),
    })
}

const UV_UC_INDEX_MARKER: &str = "的最高紫外線指數大約是";
const UV_UC_INTENSITY_MARKER: &str = "，強度屬於";

const UV_EN_PREFIX: &str = "The maximum UV Index for ";
const UV_EN_INDEX_MARKER: &str = " will be about ";
// The feed misspells "will" in this sentence; the marker must match the
// feed, not correct English.
const UV_EN_INTENSITY_MARKER: &str = ". The intensity of UV radiation wll be ";

/// The UV feed is a single free-text sentence whose shape differs entirely
/// between the two language variants.
pub fn uv_index(raw: &str, lang: Lang) -> Result<UvReport, ParseError> {
    match lang {
        Lang::TraditionalChinese => uv_index_uc(raw),
        Lang::English => uv_index_en(raw),
    }
}

fn uv_index_uc(raw: &str) -> Result<UvReport, ParseError> {
    let (date, rest) = raw
        .split_once(UV_UC_INDEX_MARKER)
        .ok_or(ParseError::MissingMarker { marker: UV_UC_INDEX_MARKER })?;

    let (index, intensity) = rest
        .split_once(UV_UC_INTENSITY_MARKER)
        .ok_or(ParseError::MissingMarker { marker: UV_UC_INTENSITY_MARKER })?;

    Ok(UvReport {
        date: date.to_string(),
        max_uv_index: index.to_string(),
        intensity: strip_terminator(intensity).to_string(),
    })
}

fn uv_index_en(raw: &str) -> Result<UvReport, ParseError> {
    // Collapse the three fixed phrases into comma separators, then read the
    // remainder positionally.
    let normalized = raw
        .replace(UV_EN_PREFIX, "")
        .replace(UV_EN_INDEX_MARKER, ",")
        .replace(UV_EN_INTENSITY_MARKER, ",");
    let normalized = strip_terminator(&normalized);

    let fields: Vec<&str> = normalized.split(',').collect();
    if fields.len() < 3 {
        return Err(ParseError::FieldCount { expected: 3, found: fields.len() });
    }

    Ok(UvReport {
        date: fields[0].to_string(),
        max_uv_index: fields[1].to_string(),
        intensity: fields[2].to_string(),
    })
}

fn strip_terminator(s: &str) -> &str {
    let s = s.trim_end();
    s.strip_suffix('。').or_else(|| s.strip_suffix('.')).unwrap_or(s)
}

const WARNING_PREFIX: &str = "var weather_warning_summary = ";

/// The warning feed wraps JSON in a JavaScript variable assignment, and the
/// live payload is truncated before the closing brace. Strip the prefix and
/// trailing junk, then parse; if that fails, re-close the object and retry.
pub fn weather_warning(raw: &str) -> Result<WarningSummary, ParseError> {
    let body = raw
        .trim_start()
        .strip_prefix(WARNING_PREFIX)
        .ok_or(ParseError::MissingMarker { marker: WARNING_PREFIX })?;
    let body = body.trim_end().trim_end_matches(';').trim_end();

    match serde_json::from_str(body) {
        Ok(value) => Ok(WarningSummary(value)),
        Err(_) => {
            let patched = format!("{body}}}");
            Ok(WarningSummary(serde_json::from_str(&patched)?))
        }
    }
}

/// The multi-day forecast is well-formed JSON.
pub fn forecast(raw: &str) -> Result<Forecast, ParseError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_weather_parses_nested_groups() {
        let raw = r#"{
            "Temperature": {"Value": "29", "Unit": "C"},
            "RH": {"Value": "78", "Unit": "%"},
            "Wind": {"WindSpeed": "12", "WindDirection": "East", "WindDirectionCode": "E"}
        }"#;

        let weather = local_weather(raw).unwrap();
        assert_eq!(weather.temperature.value, "29");
        assert_eq!(weather.humidity.unit, "%");
        assert_eq!(weather.wind.direction_code, "E");
    }

    #[test]
    fn local_weather_rejects_non_json() {
        assert!(matches!(local_weather("<html>"), Err(ParseError::Json(_))));
    }

    #[test]
    fn rainfall_maps_twelve_fields_positionally() {
        let raw = "1200@0@1230@0.5@1300@1@1330@2@1400#No heavy rain expected#預料沒有大雨#预料没有大雨";

        let nowcast = rainfall_nowcast(raw).unwrap();
        assert_eq!(nowcast.windows[0].from_time, "1200");
        assert_eq!(nowcast.windows[0].to_time, "1230");
        assert_eq!(nowcast.windows[0].value, "0");
        // Consecutive windows share their boundary times.
        assert_eq!(nowcast.windows[1].from_time, "1230");
        assert_eq!(nowcast.windows[3].from_time, "1330");
        assert_eq!(nowcast.windows[3].to_time, "1400");
        assert_eq!(nowcast.windows[3].value, "2");
        assert_eq!(nowcast.description_en, "No heavy rain expected");
    }

    #[test]
    fn rainfall_with_too_few_fields_is_a_parse_failure() {
        let err = rainfall_nowcast("1200@0@1230").unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { expected: 12, found: 3 }));
    }

    #[test]
    fn uv_english_sentence_parses() {
        let raw = "The maximum UV Index for Hong Kong will be about 8. The intensity of UV radiation wll be high.";

        let report = uv_index(raw, Lang::English).unwrap();
        assert_eq!(report.date, "Hong Kong");
        assert_eq!(report.max_uv_index, "8");
        assert_eq!(report.intensity, "high");
    }

    #[test]
    fn uv_english_garbage_is_a_parse_failure() {
        assert!(uv_index("maintenance in progress", Lang::English).is_err());
    }

    #[test]
    fn uv_chinese_sentence_parses() {
        let raw = "明天的最高紫外線指數大約是8，強度屬於甚高。";

        let report = uv_index(raw, Lang::TraditionalChinese).unwrap();
        assert_eq!(report.date, "明天");
        assert_eq!(report.max_uv_index, "8");
        assert_eq!(report.intensity, "甚高");
    }

    #[test]
    fn warning_with_trailing_junk_parses() {
        let raw = "var weather_warning_summary = {\"warningMessage\":[\"x\"]}\n;";

        let summary = weather_warning(raw).unwrap();
        assert_eq!(summary.0["warningMessage"][0], "x");
    }

    #[test]
    fn warning_truncated_before_closing_brace_is_patched() {
        let raw = "var weather_warning_summary = {\"WTS\":{\"code\":\"WTS\",\"actionCode\":\"ISSUE\"}\n;";

        let summary = weather_warning(raw).unwrap();
        assert_eq!(summary.0["WTS"]["actionCode"], "ISSUE");
    }

    #[test]
    fn warning_without_wrapper_is_a_parse_failure() {
        let err = weather_warning("{\"warningMessage\":[]}").unwrap_err();
        assert!(matches!(err, ParseError::MissingMarker { .. }));
    }

    #[test]
    fn forecast_parses_days_in_order() {
        let raw = r#"{
            "GeneralSituation": "A southwesterly airstream will affect the coast of Guangdong.",
            "DailyForecast": [
                {
                    "ForecastDate": "20260827",
                    "WeekDay": 4,
                    "ForecastMintemp": 27.0,
                    "ForecastMaxtemp": 32.0,
                    "ForecastMinrh": 65.0,
                    "ForecastMaxrh": 90.0,
                    "ForecastWeather": "Sunny intervals with showers.",
                    "ForecastWind": "Southwest force 4."
                },
                {
                    "ForecastDate": "20260828",
                    "WeekDay": 5,
                    "ForecastMintemp": 26.0,
                    "ForecastMaxtemp": 31.0,
                    "ForecastMinrh": 70.0,
                    "ForecastMaxrh": 95.0,
                    "ForecastWeather": "Occasional showers.",
                    "ForecastWind": "Southwest force 5."
                }
            ]
        }"#;

        let forecast = forecast(raw).unwrap();
        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[0].week_day, 4);
        assert_eq!(forecast.days[1].max_temp, 31.0);
        assert!(forecast.general_situation.is_some());
    }
}
