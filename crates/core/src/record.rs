//! Record types for the three collections: car arrivals, QR scans and stock.
//!
//! Field names on the wire match what the paddy-purchase front-end already
//! sends and reads (`_id`, camelCase timestamps, PascalCase stock fields).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::PaddyError;

/// Primary key field name shared by every stored record.
pub const ID_FIELD: &str = "_id";

// ── Car arrival ───────────────────────────────────────────────

/// The single current car-arrival board. Each write replaces `history` and
/// `logs` wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarArrival {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub history: Vec<Value>,
    pub logs: Vec<Value>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated body of a car-arrival write.
#[derive(Debug, Clone, PartialEq)]
pub struct CarArrivalUpdate {
    pub history: Vec<Value>,
    pub logs: Vec<Value>,
}

impl CarArrivalUpdate {
    /// Both `history` and `logs` must be JSON arrays.
    pub fn from_payload(mut body: Value) -> Result<Self, PaddyError> {
        let history = body.get_mut("history").map(Value::take);
        let logs = body.get_mut("logs").map(Value::take);
        match (history, logs) {
            (Some(Value::Array(history)), Some(Value::Array(logs))) => Ok(Self { history, logs }),
            _ => Err(PaddyError::Invalid("history and logs must be arrays".to_string())),
        }
    }
}

/// What `GET /carArrival` returns: the stored record, or empty lists when
/// nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CarArrivalSnapshot {
    Stored(CarArrival),
    Empty { history: Vec<Value>, logs: Vec<Value> },
}

impl From<Option<CarArrival>> for CarArrivalSnapshot {
    fn from(latest: Option<CarArrival>) -> Self {
        match latest {
            Some(record) => CarArrivalSnapshot::Stored(record),
            None => CarArrivalSnapshot::Empty {
                history: Vec::new(),
                logs: Vec::new(),
            },
        }
    }
}

// ── Scan ──────────────────────────────────────────────────────

/// A QR scan: whatever object the scanner posted, plus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Extract the field map of a scan submission. Anything but a non-empty
/// object is rejected. A client-supplied `_id` is discarded.
pub fn scan_fields(body: Value) -> Result<Map<String, Value>, PaddyError> {
    match body {
        Value::Object(mut fields) if !fields.is_empty() => {
            fields.retain(|key, _| key != ID_FIELD);
            Ok(fields)
        }
        _ => Err(PaddyError::Invalid("No data received".to_string())),
    }
}

// ── Stock ─────────────────────────────────────────────────────

/// Typed stock fields. Every field is optional; absent fields are omitted
/// from JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StockFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bags: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unloader_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: StockFields,
}

impl StockFields {
    /// Cast a loosely typed submission into stock fields.
    ///
    /// Text fields take strings, numbers or booleans; number fields take
    /// numbers, numeric strings or booleans. Empty strings and nulls leave a
    /// number unset. Unknown keys are dropped. All cast failures are
    /// reported together.
    pub fn from_payload(body: &Value) -> Result<Self, PaddyError> {
        let obj = body
            .as_object()
            .ok_or(PaddyError::NotAnObject { collection: "Stock" })?;

        let mut failures = Vec::new();
        let fields = StockFields {
            last_update: text_field(obj, "LastUpdate", &mut failures),
            date: text_field(obj, "Date", &mut failures),
            kind: text_field(obj, "Type", &mut failures),
            bags: number_field(obj, "Bags", &mut failures),
            weight: number_field(obj, "Weight", &mut failures),
            car_no: text_field(obj, "CarNo", &mut failures),
            party_name: text_field(obj, "PartyName", &mut failures),
            unloader_name: text_field(obj, "UnloaderName", &mut failures),
        };

        if failures.is_empty() {
            Ok(fields)
        } else {
            Err(PaddyError::Validation {
                collection: "Stock",
                failures,
            })
        }
    }
}

fn text_field(obj: &Map<String, Value>, path: &str, failures: &mut Vec<String>) -> Option<String> {
    match obj.get(path)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            failures.push(cast_failure(path, "String", other));
            None
        }
    }
}

fn number_field(obj: &Map<String, Value>, path: &str, failures: &mut Vec<String>) -> Option<f64> {
    let value = obj.get(path)?;
    let cast = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Array(_) | Value::Object(_) => None,
    };
    if cast.is_none() {
        failures.push(cast_failure(path, "Number", value));
    }
    cast
}

fn cast_failure(path: &str, kind: &str, value: &Value) -> String {
    let type_name = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!(
        "{path}: Cast to {kind} failed for value {value} (type {type_name}) at path \"{path}\""
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_car_arrival_update_accepts_arrays() {
        let update = CarArrivalUpdate::from_payload(json!({
            "history": [{"car": "TN01"}],
            "logs": [],
        }))
        .unwrap();
        assert_eq!(update.history, vec![json!({"car": "TN01"})]);
        assert!(update.logs.is_empty());
    }

    #[test]
    fn test_car_arrival_update_rejects_non_arrays() {
        for body in [
            json!({"history": {}, "logs": []}),
            json!({"history": [], "logs": "x"}),
            json!({"history": []}),
            json!({}),
            json!([1, 2]),
        ] {
            let err = CarArrivalUpdate::from_payload(body).unwrap_err();
            assert_eq!(err.to_string(), "history and logs must be arrays");
        }
    }

    #[test]
    fn test_empty_snapshot_shape() {
        let snapshot = CarArrivalSnapshot::from(None);
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), json!({"history": [], "logs": []}));
    }

    #[test]
    fn test_stored_snapshot_uses_wire_names() {
        let now = Utc::now();
        let record = CarArrival {
            id: Uuid::new_v4(),
            timestamp: now,
            history: vec![json!(1)],
            logs: vec![],
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(CarArrivalSnapshot::from(Some(record.clone()))).unwrap();
        assert_eq!(value["_id"], json!(record.id.to_string()));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["history"], json!([1]));
    }

    #[test]
    fn test_scan_fields_rejects_empty() {
        assert!(scan_fields(json!({})).is_err());
        assert!(scan_fields(json!(null)).is_err());
        assert!(scan_fields(json!("text")).is_err());
    }

    #[test]
    fn test_scan_fields_drops_client_id() {
        let fields = scan_fields(json!({"a": 1, "_id": "spoofed"})).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["a"], json!(1));
    }

    #[test]
    fn test_scan_fields_keep_key_order() {
        let body: Value = serde_json::from_str(r#"{"zeta":1,"_id":"x","b":2,"aa":3}"#).unwrap();
        let fields = scan_fields(body).unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "b", "aa"]);
    }

    #[test]
    fn test_scan_serializes_flat() {
        let mut fields = Map::new();
        fields.insert("qr".to_string(), json!("ABC-123"));
        let scan = Scan { id: Uuid::nil(), fields };
        let value = serde_json::to_value(&scan).unwrap();
        assert_eq!(value, json!({"_id": Uuid::nil().to_string(), "qr": "ABC-123"}));
    }

    #[test]
    fn test_stock_cast_full_record() {
        let fields = StockFields::from_payload(&json!({
            "LastUpdate": "2024-01-01 10:00",
            "Date": "2024-01-01",
            "Type": "Paddy",
            "Bags": "40",
            "Weight": 2400,
            "CarNo": 1234,
            "PartyName": "Ravi Traders",
            "UnloaderName": "Kumar",
            "Ignored": true,
        }))
        .unwrap();
        assert_eq!(fields.bags, Some(40.0));
        assert_eq!(fields.weight, Some(2400.0));
        assert_eq!(fields.car_no.as_deref(), Some("1234"));
        assert_eq!(fields.kind.as_deref(), Some("Paddy"));

        let value = serde_json::to_value(&fields).unwrap();
        assert!(value.get("Ignored").is_none());
        assert_eq!(value["Type"], json!("Paddy"));
        assert_eq!(value["UnloaderName"], json!("Kumar"));
    }

    #[test]
    fn test_stock_cast_empty_and_null_numbers() {
        let fields = StockFields::from_payload(&json!({"Weight": "", "Bags": null})).unwrap();
        assert_eq!(fields.weight, None);
        assert_eq!(fields.bags, None);
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_stock_cast_failures_are_collected() {
        let err = StockFields::from_payload(&json!({
            "Weight": "heavy",
            "PartyName": {"name": "x"},
        }))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Stock validation failed: "));
        assert!(message.contains("Cast to Number failed for value \"heavy\" (type string) at path \"Weight\""));
        assert!(message.contains("Cast to String failed"));
        assert!(message.contains("\"PartyName\""));
    }

    #[test]
    fn test_stock_cast_rejects_non_object() {
        let err = StockFields::from_payload(&json!([1])).unwrap_err();
        assert_eq!(err.to_string(), "Stock validation failed: expected a JSON object");
    }

    #[test]
    fn test_stock_deserializes_from_wire() {
        let stock: Stock = serde_json::from_value(json!({
            "_id": Uuid::nil().to_string(),
            "Date": "2024-01-02",
            "Weight": 12.5,
        }))
        .unwrap();
        assert_eq!(stock.fields.date.as_deref(), Some("2024-01-02"));
        assert_eq!(stock.fields.weight, Some(12.5));
        assert_eq!(stock.fields.car_no, None);
    }
}
