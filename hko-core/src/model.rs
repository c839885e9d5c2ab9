use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Language variant of the upstream feeds. Selects both the endpoint and the
/// parsing strategy for the UV index, warning, and forecast feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    TraditionalChinese,
    English,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::TraditionalChinese => "uc",
            Lang::English => "en",
        }
    }

    pub const fn all() -> &'static [Lang] {
        &[Lang::TraditionalChinese, Lang::English]
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Lang {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "uc" => Ok(Lang::TraditionalChinese),
            "en" => Ok(Lang::English),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: uc, en."
            )),
        }
    }
}

/// Outcome of one retrieval operation. The numeric codes are the upstream
/// module's wire values and are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Invalid = 0,
    Success = 1,
    ParseFailure = 2,
    OutOfCoverage = 3,
    PartialSuccess = 4,
    NetworkFailure = 5,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Invalid => "invalid",
            Status::Success => "success",
            Status::ParseFailure => "parse-failure",
            Status::OutOfCoverage => "out-of-coverage",
            Status::PartialSuccess => "partial-success",
            Status::NetworkFailure => "network-failure",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by an [`Envelope`]. Only Success carries structured data
/// and only PartialSuccess carries raw fallback text.
#[derive(Debug, Clone)]
pub enum Payload<T> {
    Data(T),
    Raw(String),
    Empty,
}

/// The uniform status-coded wrapper returned by every retrieval operation.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub status: Status,
    pub payload: Payload<T>,
    /// Resolved place name, set only by the local-weather operation.
    pub place: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            payload: Payload::Data(data),
            place: None,
        }
    }

    pub fn success_at(data: T, place: String) -> Self {
        Self {
            status: Status::Success,
            payload: Payload::Data(data),
            place: Some(place),
        }
    }

    pub fn partial(raw: String) -> Self {
        Self {
            status: Status::PartialSuccess,
            payload: Payload::Raw(raw),
            place: None,
        }
    }

    /// A failure envelope; the payload is always empty for these.
    pub fn empty(status: Status) -> Self {
        Self {
            status,
            payload: Payload::Empty,
            place: None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match &self.payload {
            Payload::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Current conditions for one local-weather grid cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalWeather {
    #[serde(rename = "Temperature")]
    pub temperature: Temperature,
    #[serde(rename = "RH")]
    pub humidity: Humidity,
    #[serde(rename = "Wind")]
    pub wind: Wind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Temperature {
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Humidity {
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    #[serde(rename = "WindSpeed")]
    pub speed: String,
    #[serde(rename = "WindDirection")]
    pub direction: String,
    #[serde(rename = "WindDirectionCode")]
    pub direction_code: String,
}

/// One 30-minute forward-looking rainfall window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainfallWindow {
    pub from_time: String,
    pub to_time: String,
    pub value: String,
}

/// Two-hour rainfall nowcast: four 30-minute windows covering minutes
/// 0-120, plus the three locale descriptions the feed always carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainfallNowcast {
    pub windows: [RainfallWindow; 4],
    pub description_en: String,
    pub description_tc: String,
    pub description_sc: String,
}

/// Forecast of today's maximum UV index. Fields are kept as the upstream
/// sentence fragments; the index is not guaranteed numeric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvReport {
    pub date: String,
    pub max_uv_index: String,
    pub intensity: String,
}

/// Warning summary as published. The set of warning codes is open-ended
/// upstream, so the inner object is kept as structured JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarningSummary(pub serde_json::Value);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(rename = "GeneralSituation", default)]
    pub general_situation: Option<String>,
    #[serde(rename = "DailyForecast")]
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    #[serde(rename = "ForecastDate", with = "compact_date")]
    pub date: NaiveDate,
    /// Day-of-week index as published by the feed.
    #[serde(rename = "WeekDay")]
    pub week_day: u8,
    #[serde(rename = "ForecastMintemp")]
    pub min_temp: f64,
    #[serde(rename = "ForecastMaxtemp")]
    pub max_temp: f64,
    #[serde(rename = "ForecastMinrh")]
    pub min_rh: f64,
    #[serde(rename = "ForecastMaxrh")]
    pub max_rh: f64,
    #[serde(rename = "ForecastWeather")]
    pub weather: String,
    #[serde(rename = "ForecastWind")]
    pub wind: String,
}

/// The feed publishes dates as compact `YYYYMMDD` strings.
mod compact_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
