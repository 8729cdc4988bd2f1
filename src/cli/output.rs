//! Output formatting module
//!
//! This module handles formatting ledger records and safety reports for the
//! table and JSON output formats.

use crate::Result;
use crate::ledger::models::{Product, SensorReading, Worker};
use crate::safety::SafetyReport;
use serde_json::json;

/// Truncate on a character boundary; byte slicing would panic on
/// multi-byte text
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Output products as JSON
pub fn products_json(w: &mut impl std::io::Write, products: &[Product]) -> Result<()> {
    let output = json!({
        "summary": { "total_products": products.len() },
        "products": products,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output products as text table
pub fn products_table(w: &mut impl std::io::Write, products: &[Product]) -> Result<()> {
    writeln!(w, "Product Inventory")?;
    writeln!(w, "{}", "=".repeat(100))?;

    if products.is_empty() {
        writeln!(w, "No products registered.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{:>5} {:<28} {:>10} {:>10} {:<12} {:<30}",
        "ID", "Name", "Price", "Req.Temp", "Mfg Date", "Description"
    )?;
    writeln!(w, "{:-<100}", "")?;

    for p in products {
        let description = truncate(&p.description, 28);

        writeln!(
            w,
            "{:>5} {:<28} {:>10} {:>8}°C {:<12} {:<30}",
            p.id, p.name, p.price, p.required_temp, p.manufacturing_date, description
        )?;
    }
    writeln!(w)?;

    Ok(())
}

/// Output a shipment journey as JSON
pub fn journey_json(
    w: &mut impl std::io::Write,
    product: &Product,
    report: &SafetyReport,
) -> Result<()> {
    let verdict = if report.is_empty() {
        "no checkpoints recorded"
    } else if report.overall_safe {
        "verified"
    } else {
        "cancelled"
    };

    let output = json!({
        "product": product,
        "verdict": verdict,
        "overall_safe": report.overall_safe,
        "checkpoints": report.per_event.iter().map(|e| {
            json!({
                "location": e.event.location,
                "timestamp": e.event.timestamp.to_string(),
                "temperature": e.event.temperature,
                "humidity": e.event.humidity,
                "heat_index": e.event.heat_index,
                "worker_id": e.event.worker_id,
                "quantity": e.event.total_quantity,
                "completed": e.event.completed,
                "safe": e.is_safe,
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output a shipment journey as text table
pub fn journey_table(
    w: &mut impl std::io::Write,
    product: &Product,
    report: &SafetyReport,
) -> Result<()> {
    writeln!(w, "Shipment Journey - {} (#{})", product.name, product.id)?;
    writeln!(w, "{}", "=".repeat(100))?;
    writeln!(w, "Required temperature: {}°C", product.required_temp)?;

    if report.is_empty() {
        writeln!(w, "Verdict: no checkpoints recorded yet")?;
        writeln!(w)?;
        return Ok(());
    }

    let verdict = if report.overall_safe {
        "VERIFIED - temperature stayed within bounds"
    } else {
        "CANCELLED - temperature limits exceeded during transit"
    };
    writeln!(w, "Verdict: {}", verdict)?;
    writeln!(w)?;

    writeln!(
        w,
        "{:<8} {:<26} {:<24} {:>6} {:>6} {:>8} {:>9}",
        "Safety", "Location", "Timestamp", "Temp", "Hum", "HeatIdx", "Delivered"
    )?;
    writeln!(w, "{:-<100}", "")?;

    for e in &report.per_event {
        let marker = if e.is_safe { "ok" } else { "BREACH" };
        let location = truncate(&e.event.location, 24);

        writeln!(
            w,
            "{:<8} {:<26} {:<24} {:>4}°C {:>5}% {:>8} {:>9}",
            marker,
            location,
            e.event.timestamp.to_string(),
            e.event.temperature,
            e.event.humidity,
            e.event.heat_index,
            if e.event.completed { "yes" } else { "no" }
        )?;
    }
    writeln!(w)?;

    Ok(())
}

/// Output sensor readings as JSON
pub fn readings_json(w: &mut impl std::io::Write, readings: &[SensorReading]) -> Result<()> {
    let output = json!({
        "summary": { "total_readings": readings.len() },
        "readings": readings,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output sensor readings as text table
pub fn readings_table(w: &mut impl std::io::Write, readings: &[SensorReading]) -> Result<()> {
    writeln!(w, "Environmental Data Log")?;
    writeln!(w, "{}", "=".repeat(50))?;

    if readings.is_empty() {
        writeln!(w, "No sensor readings recorded.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{:>5} {:>6} {:>9} {:>9}",
        "No.", "Temp", "Humidity", "HeatIdx"
    )?;
    writeln!(w, "{:-<50}", "")?;

    for (i, r) in readings.iter().enumerate() {
        writeln!(
            w,
            "{:>5} {:>4}°C {:>8}% {:>9}",
            i + 1,
            r.temperature,
            r.humidity,
            r.heat_index
        )?;
    }
    writeln!(w)?;

    Ok(())
}

/// Output workers as JSON
pub fn workers_json(w: &mut impl std::io::Write, workers: &[Worker]) -> Result<()> {
    let output = json!({
        "summary": { "total_workers": workers.len() },
        "workers": workers.iter().map(|wk| {
            json!({
                "id": wk.id,
                "name": wk.name,
                "registered_at": wk.registered_at.to_string(),
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output workers as text table
pub fn workers_table(w: &mut impl std::io::Write, workers: &[Worker]) -> Result<()> {
    writeln!(w, "Registered Workers")?;
    writeln!(w, "{}", "=".repeat(60))?;

    if workers.is_empty() {
        writeln!(w, "No workers registered.")?;
        return Ok(());
    }

    writeln!(w, "{:>5} {:<24} {:<24}", "ID", "Name", "Registered On")?;
    writeln!(w, "{:-<60}", "")?;

    for wk in workers {
        writeln!(
            w,
            "{:>5} {:<24} {:<24}",
            wk.id,
            wk.name,
            wk.registered_at.to_string()
        )?;
    }
    writeln!(w)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::{StatusEvent, Timestamp};
    use crate::safety;

    fn test_product() -> Product {
        Product {
            id: 7,
            name: "Insulin".to_string(),
            price: "450.00".to_string(),
            description: "Cold chain vials".to_string(),
            required_temp: 8,
            manufacturing_date: "2026-01-12".to_string(),
            registered_at: Timestamp::Unknown,
        }
    }

    fn test_event(temp: i64) -> StatusEvent {
        StatusEvent {
            location: "Mumbai".to_string(),
            temperature: temp,
            humidity: 55,
            heat_index: temp + 2,
            worker_id: 1,
            product_id: 7,
            total_quantity: 500,
            completed: false,
            timestamp: Timestamp::Unknown,
        }
    }

    #[test]
    fn test_products_output() {
        let products = vec![test_product()];

        let mut buf = Vec::new();
        products_table(&mut buf, &products).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Insulin"));

        let mut buf = Vec::new();
        products_json(&mut buf, &products).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["summary"]["total_products"], 1);
    }

    #[test]
    fn test_journey_table_breach_marker() {
        let product = test_product();
        let report = safety::evaluate(product.required_temp, &[test_event(6), test_event(12)]);

        let mut buf = Vec::new();
        journey_table(&mut buf, &product, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("BREACH"));
        assert!(text.contains("CANCELLED"));
    }

    #[test]
    fn test_journey_empty_history_has_no_verdict() {
        let product = test_product();
        let report = safety::evaluate(product.required_temp, &[]);

        let mut buf = Vec::new();
        journey_table(&mut buf, &product, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("no checkpoints recorded"));
        assert!(!text.contains("VERIFIED"));
    }

    #[test]
    fn test_journey_json_verdict() {
        let product = test_product();
        let report = safety::evaluate(product.required_temp, &[test_event(6)]);

        let mut buf = Vec::new();
        journey_json(&mut buf, &product, &report).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["verdict"], "verified");
        assert_eq!(parsed["checkpoints"][0]["safe"], true);
        // Quantities stay integral in JSON output
        assert_eq!(parsed["checkpoints"][0]["quantity"], 500);
    }

    #[test]
    fn test_unknown_timestamp_never_renders_epoch() {
        let product = test_product();
        let report = safety::evaluate(product.required_temp, &[test_event(6)]);

        let mut buf = Vec::new();
        journey_table(&mut buf, &product, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("unknown"));
        assert!(!text.contains("1970"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Accented text puts multi-byte characters at the cut point
        let mut event = test_event(6);
        event.location = "Entrepôt réfrigéré de Müchhausen".to_string();

        let mut product = test_product();
        product.description = "Flacons réfrigérés, chaîne du froid continue".to_string();

        let report = safety::evaluate(product.required_temp, std::slice::from_ref(&event));

        let mut buf = Vec::new();
        journey_table(&mut buf, &product, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Entrepôt réfrigéré de..."));

        let mut buf = Vec::new();
        products_table(&mut buf, std::slice::from_ref(&product)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Flacons réfrigérés, chaîn..."));
    }

    #[test]
    fn test_truncate_short_strings_untouched() {
        assert_eq!(truncate("Mumbai", 24), "Mumbai");
        assert_eq!(truncate("", 24), "");
    }

    #[test]
    fn test_workers_table() {
        let workers = vec![Worker {
            name: "Asha Rao".to_string(),
            id: 1,
            registered_at: Timestamp::from_unix_seconds(1_700_000_000),
        }];

        let mut buf = Vec::new();
        workers_table(&mut buf, &workers).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Asha Rao"));
        assert!(text.contains("2023-11-14"));
    }
}
