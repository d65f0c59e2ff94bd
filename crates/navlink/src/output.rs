use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use navlink_client::TelemetryEvent;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    #[serde(flatten)]
    event: &'a TelemetryEvent,
    received_at: u64,
}

pub fn print_event(event: &TelemetryEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventOutput {
                event,
                received_at: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["EVENT", "FIELD", "VALUE"]);
            for (field, value) in event_fields(event) {
                table.add_row(vec![event.name().to_string(), field, value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", pretty_event(event)),
    }
}

pub fn pretty_event(event: &TelemetryEvent) -> String {
    match event {
        TelemetryEvent::OrientationUpdated(q) => format!(
            "{} x={:.6} y={:.6} z={:.6} w={:.6}",
            event.name(),
            q.x,
            q.y,
            q.z,
            q.w
        ),
        TelemetryEvent::GeoFixUpdated(p) => format!(
            "{} lat={:.8} lon={:.8} alt={:.3}",
            event.name(),
            p.latitude,
            p.longitude,
            p.altitude
        ),
        TelemetryEvent::HealthStatusUpdated { statuses } => {
            let entries: Vec<String> = statuses
                .iter()
                .map(|(name, message)| format!("{name}={message:?}"))
                .collect();
            format!("{} {}", event.name(), entries.join(" "))
        }
        TelemetryEvent::ConnectionFailed { retries } => {
            format!("{} retries={retries}", event.name())
        }
    }
}

fn event_fields(event: &TelemetryEvent) -> Vec<(String, String)> {
    let value = serde_json::to_value(event).unwrap_or(Value::Null);
    let mut fields = Vec::new();
    flatten("", &value, &mut fields);
    fields.retain(|(field, _)| field != "event");
    fields
}

/// Print a decoded message as JSON, pretty JSON, or a field table.
pub fn print_value<T: Serialize>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => {
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            let mut fields = Vec::new();
            flatten("", &value, &mut fields);

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in fields {
                table.add_row(vec![field, value]);
            }
            println!("{table}");
        }
    }
}

/// Flatten nested JSON into dotted `path -> scalar` pairs.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(&join(key), value, out);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(&join(&index.to_string()), value, out);
            }
        }
        Value::String(text) => out.push((prefix.to_string(), text.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
