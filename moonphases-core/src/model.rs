use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Input to a provider: which city, on which calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRequest {
    pub city: String,
    pub date: NaiveDate,
}

/// One labeled event as reported by the provider, e.g. `{"phen": "R", "time": "06:12"}`.
///
/// Both fields are opaque; the time is never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phenomenon {
    #[serde(deserialize_with = "null_as_default")]
    pub phen: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
}

/// Nearest major lunar phase to the query date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosestPhase {
    #[serde(deserialize_with = "null_as_default")]
    pub phase: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
}

/// Mirror of the USNO "one day" JSON document.
///
/// Parsing is lenient: unknown fields are ignored, and missing or `null`
/// fields fall back to their zero value, at any depth. Coordinates that do
/// not fit in an `f32` are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExternalPhaseDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub error: bool,
    #[serde(rename = "apiversion", deserialize_with = "null_as_default")]
    pub api_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub month: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub day: u32,
    #[serde(rename = "dayofweek", deserialize_with = "null_as_default")]
    pub day_of_week: String,
    #[serde(rename = "datechanged", deserialize_with = "null_as_default")]
    pub date_changed: bool,
    #[serde(rename = "isdst", deserialize_with = "null_as_default")]
    pub is_dst: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tz: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "f32_in_range")]
    pub lon: f32,
    #[serde(deserialize_with = "f32_in_range")]
    pub lat: f32,
    #[serde(rename = "moondata", deserialize_with = "null_entries_as_default")]
    pub moon_data: Vec<Phenomenon>,
    #[serde(rename = "sundata", deserialize_with = "null_entries_as_default")]
    pub sun_data: Vec<Phenomenon>,
    #[serde(rename = "closestphase", deserialize_with = "null_as_default")]
    pub closest_phase: ClosestPhase,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_entries_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let entries = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries.into_iter().map(Option::unwrap_or_default).collect())
}

fn f32_in_range<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if value.is_finite() && value.abs() <= f64::from(f32::MAX) {
        Ok(value as f32)
    } else {
        Err(de::Error::custom(format_args!("number {value} out of range for f32")))
    }
}

/// Moon events bound by name once the document has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoonEvents {
    pub rise: Phenomenon,
    pub upper_transit: Phenomenon,
    pub set: Phenomenon,
}

/// Moon phase summary returned to RPC callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInfo {
    pub city: String,
    pub lat: String,
    pub lon: String,
    pub closest_phase: String,
    pub rise: String,
    pub upper_transit: String,
    pub set: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPhasesRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPhasesResponse {
    pub phase_info: Option<PhaseInfo>,
}
