//! Decoder for positional flight telemetry records.
//!
//! A state vector arrives as a heterogeneous JSON array:
//!
//! ```text
//! ["a0b1c2", "UA123   ", "United States", 1700000000, 1700000005,
//!  -87.9, 41.97, 10668.0, false, 231.5, 92.0, 0.0, null, 10900.0, ...]
//! ```
//!
//! Each position is decoded on its own. A value of the wrong type, `null`,
//! or a missing index all mean the field is absent; only a record that is
//! not an array at all is rejected.

use serde_json::Value;

use super::error::ClientError;
use super::types::FlightStatus;

const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LAST_CONTACT: usize = 4;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const ON_GROUND: usize = 8;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;
const VERTICAL_RATE: usize = 11;
const GEO_ALTITUDE: usize = 13;

/// One decoded position of a telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    Absent,
}

impl TelemetryValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => TelemetryValue::Text(s.clone()),
            Value::Bool(b) => TelemetryValue::Flag(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => TelemetryValue::Integer(i),
                None => n
                    .as_f64()
                    .map(TelemetryValue::Number)
                    .unwrap_or(TelemetryValue::Absent),
            },
            Value::Null | Value::Array(_) | Value::Object(_) => TelemetryValue::Absent,
        }
    }

    /// Trimmed text; blank strings count as absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            TelemetryValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TelemetryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats; other types are absent.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TelemetryValue::Number(n) => Some(*n),
            TelemetryValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            TelemetryValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// A positional record with typed, lenient accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    fields: Vec<TelemetryValue>,
}

impl TelemetryRecord {
    pub fn from_json(value: &Value) -> Result<Self, ClientError> {
        let Value::Array(items) = value else {
            return Err(ClientError::Decode(format!(
                "telemetry record must be an array, got {}",
                json_kind(value)
            )));
        };
        Ok(Self {
            fields: items.iter().map(TelemetryValue::from_json).collect(),
        })
    }

    pub fn field(&self, index: usize) -> &TelemetryValue {
        self.fields.get(index).unwrap_or(&TelemetryValue::Absent)
    }
}

impl From<&TelemetryRecord> for FlightStatus {
    fn from(record: &TelemetryRecord) -> Self {
        FlightStatus {
            icao24: record.field(ICAO24).as_text(),
            callsign: record.field(CALLSIGN).as_text(),
            origin_country: record.field(ORIGIN_COUNTRY).as_text(),
            last_contact: record.field(LAST_CONTACT).as_integer(),
            longitude: record.field(LONGITUDE).as_number(),
            latitude: record.field(LATITUDE).as_number(),
            altitude_m: record
                .field(BARO_ALTITUDE)
                .as_number()
                .or_else(|| record.field(GEO_ALTITUDE).as_number()),
            on_ground: record.field(ON_GROUND).as_flag(),
            velocity_ms: record.field(VELOCITY).as_number(),
            heading_deg: record.field(TRUE_TRACK).as_number(),
            vertical_rate_ms: record.field(VERTICAL_RATE).as_number(),
        }
    }
}

/// Decode a single state vector.
pub fn decode_state_vector(value: &Value) -> Result<FlightStatus, ClientError> {
    let record = TelemetryRecord::from_json(value)?;
    Ok(FlightStatus::from(&record))
}

/// Find the state vector for `callsign` in a `{"time": .., "states": [..]}`
/// response.
///
/// Callsigns are compared trimmed and case-insensitively. Records that fail
/// to decode are skipped.
pub fn decode_response(body: &Value, callsign: &str) -> Result<FlightStatus, ClientError> {
    let states = match body.get("states") {
        Some(Value::Array(states)) => states,
        None | Some(Value::Null) => return Err(ClientError::NotFound(callsign.to_string())),
        Some(other) => {
            return Err(ClientError::Decode(format!(
                "'states' must be an array, got {}",
                json_kind(other)
            )))
        }
    };

    let wanted = callsign.trim();
    states
        .iter()
        .filter_map(|state| match decode_state_vector(state) {
            Ok(status) => Some(status),
            Err(err) => {
                tracing::trace!(error = %err, "skipping malformed state vector");
                None
            }
        })
        .find(|status| {
            status
                .callsign
                .as_deref()
                .is_some_and(|cs| cs.eq_ignore_ascii_case(wanted))
        })
        .ok_or_else(|| ClientError::NotFound(callsign.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
