//! Output formatting for stored records.

use std::collections::BTreeMap;

use cadastro_core::{Person, StoredRecord};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Formats a listing keyed by storage id.
///
/// Text output is one `<id> = <name>. <age> years old. CPF <cpf>` line per
/// record, or a single notice when there are none.
pub fn format_listing(
    records: &BTreeMap<i64, Person>,
    format: OutputFormat,
) -> Result<String, String> {
    let rows: Vec<StoredRecord> = records
        .iter()
        .map(|(id, person)| StoredRecord::new(*id, person.clone()))
        .collect();

    match format {
        OutputFormat::Text => {
            if rows.is_empty() {
                return Ok("No records found.\n".to_string());
            }
            Ok(rows.iter().map(|r| format!("{r}\n")).collect())
        }
        OutputFormat::Json => serde_json::to_string_pretty(&rows)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&rows).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Formats a single record.
pub fn format_record(record: &StoredRecord, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(format!("{record}\n")),
        OutputFormat::Json => serde_json::to_string_pretty(record)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(record).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BTreeMap<i64, Person> {
        BTreeMap::from([
            (2, Person::new("Bia", 21, "10000000002")),
            (1, Person::new("Ana", 20, "10000000001")),
        ])
    }

    #[test]
    fn test_text_listing_in_id_order() {
        let out = format_listing(&sample(), OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "1 = Ana. 20 years old. CPF 10000000001\n2 = Bia. 21 years old. CPF 10000000002\n"
        );
    }

    #[test]
    fn test_text_listing_empty() {
        let out = format_listing(&BTreeMap::new(), OutputFormat::Text).unwrap();
        assert_eq!(out, "No records found.\n");
    }

    #[test]
    fn test_json_listing() {
        let out = format_listing(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[1]["name"], "Bia");
    }

    #[test]
    fn test_yaml_record() {
        let record = StoredRecord::new(3, Person::new("Caio", 22, "3"));
        let out = format_record(&record, OutputFormat::Yaml).unwrap();
        assert!(out.contains("name: Caio"));
        assert!(out.contains("id: 3"));
    }
}
