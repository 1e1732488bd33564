//! Delimited-text export of the currently loaded readings.
//!
//! Fields containing the delimiter, a quote or a line break are quoted
//! with doubled inner quotes, so free-text values cannot corrupt rows.

use chrono::SecondsFormat;

use crate::telemetry::{Selection, TaggedReading};

const DELIMITER: char = ',';

fn field(value: &str) -> String {
    let needs_quoting = value.contains([DELIMITER, '"', '\n', '\r']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row(values: &[String]) -> String {
    values
        .iter()
        .map(|v| field(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode a header plus uniform rows into one CSV blob.
pub fn encode(header: &[&str], rows: &[Vec<String>]) -> String {
    let header_row = row(&header.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    let mut lines = vec![header_row];
    lines.extend(rows.iter().map(|r| row(r)));
    lines.join("\n")
}

/// The dashboard's export: the flat reading list in timestamp order.
pub fn readings_csv(readings: &[TaggedReading]) -> String {
    let rows: Vec<Vec<String>> = readings
        .iter()
        .map(|r| {
            vec![
                r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                format!("{}", r.volume_ml),
                r.device_id.clone(),
            ]
        })
        .collect();
    encode(&["timestamp", "volume_ml", "device_id"], &rows)
}

/// Download name for the current selection.
pub fn export_filename(selection: &Selection) -> String {
    format!("{}_data.csv", selection.as_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn plain_fields_pass_through() {
        let out = encode(
            &["a", "b"],
            &[vec!["1".to_string(), "x".to_string()]],
        );
        assert_eq!(out, "a,b\n1,x");
    }

    #[test]
    fn embedded_delimiters_quotes_and_newlines_are_escaped() {
        let out = encode(
            &["name", "notes"],
            &[vec![
                "Acme, Inc.".to_string(),
                "line one\nsays \"hi\"".to_string(),
            ]],
        );
        assert_eq!(out, "name,notes\n\"Acme, Inc.\",\"line one\nsays \"\"hi\"\"\"");
    }

    #[test]
    fn readings_export_shape() {
        let ts: DateTime<Utc> = "2024-01-01T08:00:00Z".parse().expect("ts");
        let readings = vec![TaggedReading {
            device_id: "7".into(),
            timestamp: ts,
            volume_ml: 250.0,
        }];
        assert_eq!(
            readings_csv(&readings),
            "timestamp,volume_ml,device_id\n2024-01-01T08:00:00.000Z,250,7"
        );
    }

    #[test]
    fn filenames_follow_the_selection() {
        assert_eq!(export_filename(&Selection::All), "ALL_data.csv");
        assert_eq!(
            export_filename(&Selection::One("fountain-7".into())),
            "fountain-7_data.csv"
        );
    }
}
