//! Normalizer module - converts raw ledger records into typed domain records
//!
//! The ledger gateway relays contract structs in two shapes: positional
//! sequences (`["Mumbai", "0x65f3...", 22, ...]`) and named objects
//! (`{"location": "Mumbai", ...}`). Numeric fields may arrive as plain
//! numbers, decimal strings, `0x`-prefixed hex strings, or boxed big-number
//! objects (`{"_hex": "0x16"}`). All of that ambiguity is resolved here, at
//! one boundary; everything downstream sees only the typed records in
//! [`crate::ledger::models`].

use crate::ledger::models::{Product, SensorReading, StatusEvent, Timestamp, Worker};
use crate::{Error, Result};
use serde_json::Value;

/// Adapter over one raw ledger record.
///
/// Field access tries the named form first and falls back to a fixed
/// positional index, failing with `MalformedRecord` if neither is present.
pub struct RawRecord<'a> {
    value: &'a Value,
    kind: &'static str,
}

impl<'a> RawRecord<'a> {
    pub fn new(value: &'a Value, kind: &'static str) -> Self {
        Self { value, kind }
    }

    /// Look up a field by name, then by positional index
    pub fn field(&self, name: &str, index: usize) -> Result<&'a Value> {
        self.field_opt(name, index).ok_or_else(|| {
            Error::malformed(format!(
                "{} record has neither field '{}' nor index {}",
                self.kind, name, index
            ))
        })
    }

    /// Like [`RawRecord::field`] but absent fields are `None`
    pub fn field_opt(&self, name: &str, index: usize) -> Option<&'a Value> {
        match self.value {
            Value::Object(map) => map.get(name),
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn string(&self, name: &str, index: usize) -> Result<String> {
        let v = self.field(name, index)?;
        coerce_string(v).ok_or_else(|| {
            Error::malformed(format!("{} field '{}' is not a string", self.kind, name))
        })
    }

    pub fn int(&self, name: &str, index: usize) -> Result<i64> {
        let v = self.field(name, index)?;
        coerce_int(v).ok_or_else(|| {
            Error::malformed(format!("{} field '{}' is not a number", self.kind, name))
        })
    }

    pub fn uint(&self, name: &str, index: usize) -> Result<u64> {
        let n = self.int(name, index)?;
        u64::try_from(n).map_err(|_| {
            Error::malformed(format!("{} field '{}' is negative", self.kind, name))
        })
    }

    pub fn bool(&self, name: &str, index: usize) -> Result<bool> {
        let v = self.field(name, index)?;
        coerce_bool(v).ok_or_else(|| {
            Error::malformed(format!("{} field '{}' is not a boolean", self.kind, name))
        })
    }

    /// Timestamps degrade to `Unknown` rather than failing: a zero, missing,
    /// or unparsable value must never surface as an epoch-start date
    pub fn timestamp(&self, name: &str, index: usize) -> Timestamp {
        match self.field_opt(name, index) {
            Some(v) => coerce_int(v)
                .map(Timestamp::from_unix_seconds)
                .unwrap_or(Timestamp::Unknown),
            None => Timestamp::Unknown,
        }
    }
}

/// Coerce a raw value into an integer.
///
/// Accepts plain JSON numbers, decimal strings, `0x`-prefixed hex strings
/// (arbitrary precision on the wire, rejected if it overflows i64), and
/// boxed big-number objects carrying a `_hex` field.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                i64::from_str_radix(hex, 16).ok()
            } else {
                s.parse::<i64>().ok()
            }
        }
        Value::Object(map) => map.get("_hex").and_then(coerce_int),
        _ => None,
    }
}

/// Coerce a raw value into a string; numbers are stringified verbatim
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a raw value into a boolean; the ledger also emits 0/1 flags
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize one raw product record.
///
/// Positional layout: `[id, name, price, description, reqtemp,
/// manufacturing, timestamp?]`; the trailing timestamp is absent on older
/// records.
pub fn normalize_product(raw: &Value) -> Result<Product> {
    let rec = RawRecord::new(raw, "product");
    Ok(Product {
        id: rec.uint("id", 0)?,
        name: rec.string("name", 1)?,
        price: rec.string("price", 2)?,
        description: rec.string("description", 3)?,
        required_temp: rec.int("reqtemp", 4)?,
        manufacturing_date: rec.string("manufacturing", 5)?,
        registered_at: rec.timestamp("timestamp", 6),
    })
}

/// Normalize one raw status event.
///
/// Positional layout: `[location, timestamp, temp, humidity, heatindex,
/// wid, pid, total_quantity, flag]`.
pub fn normalize_status_event(raw: &Value) -> Result<StatusEvent> {
    let rec = RawRecord::new(raw, "status");
    Ok(StatusEvent {
        location: rec.string("location", 0)?,
        timestamp: rec.timestamp("timestamp", 1),
        temperature: rec.int("temp", 2)?,
        humidity: rec.int("humidity", 3)?,
        heat_index: rec.int("heatindex", 4)?,
        worker_id: rec.uint("wid", 5)?,
        product_id: rec.uint("pid", 6)?,
        total_quantity: rec.uint("total_quantity", 7)?,
        completed: rec.bool("flag", 8)?,
    })
}

/// Normalize one raw sensor reading.
///
/// Positional layout: `[temp, humidity, heatindex, pid]`.
pub fn normalize_sensor_reading(raw: &Value) -> Result<SensorReading> {
    let rec = RawRecord::new(raw, "reading");
    Ok(SensorReading {
        temperature: rec.int("temp", 0)?,
        humidity: rec.int("humidity", 1)?,
        heat_index: rec.int("heatindex", 2)?,
        product_id: rec.uint("pid", 3)?,
    })
}

/// Normalize one raw worker record.
///
/// Positional layout: `[name, id, timestamp]`.
pub fn normalize_worker(raw: &Value) -> Result<Worker> {
    let rec = RawRecord::new(raw, "worker");
    Ok(Worker {
        name: rec.string("name", 0)?,
        id: rec.uint("id", 1)?,
        registered_at: rec.timestamp("timestamp", 2),
    })
}

/// Normalize an ordered sequence of status events, preserving ledger order
pub fn normalize_status_history(raw: &Value) -> Result<Vec<StatusEvent>> {
    let items = raw
        .as_array()
        .ok_or_else(|| Error::malformed("status history is not a sequence"))?;
    items.iter().map(normalize_status_event).collect()
}

/// Normalize a sequence of products
pub fn normalize_products(raw: &Value) -> Result<Vec<Product>> {
    let items = raw
        .as_array()
        .ok_or_else(|| Error::malformed("product list is not a sequence"))?;
    items.iter().map(normalize_product).collect()
}

/// Normalize a sequence of sensor readings
pub fn normalize_sensor_readings(raw: &Value) -> Result<Vec<SensorReading>> {
    let items = raw
        .as_array()
        .ok_or_else(|| Error::malformed("sensor readings is not a sequence"))?;
    items.iter().map(normalize_sensor_reading).collect()
}

/// Normalize a sequence of workers
pub fn normalize_workers(raw: &Value) -> Result<Vec<Worker>> {
    let items = raw
        .as_array()
        .ok_or_else(|| Error::malformed("worker list is not a sequence"))?;
    items.iter().map(normalize_worker).collect()
}
