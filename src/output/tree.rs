use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::constants::TREE_INDENT;

/// Writes a tree payload as indented JSON.
///
/// Every scalar is stringified before serialization, so numbers and
/// booleans appear quoted and JSON null becomes the literal string
/// `"null"`. Nesting is preserved: mappings stay objects, sequences
/// stay arrays. Key order is whatever the payload's map yields.
///
/// Recursion is unconditional; payloads are finite by construction
/// since [`Value`] cannot express cycles.
pub fn write_tree(path: &Path, root: &Map<String, Value>) -> Result<()> {
    let normalized = normalize_map(root);

    let file = File::create(path)
        .with_context(|| format!("Failed to create tree artifact {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(TREE_INDENT);
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    Value::Object(normalized)
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to serialize tree artifact {}", path.display()))?;

    writer
        .flush()
        .with_context(|| format!("Failed to flush tree artifact {}", path.display()))?;

    Ok(())
}

fn normalize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), normalize(value)))
        .collect()
}

/// Scalars become strings, containers recurse.
fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Null => Value::String("null".to_string()),
        Value::String(s) => Value::String(s.clone()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::json;

    use crate::test_utils::{create_temp_dir, sample_tree};

    fn write_and_parse(root: &Map<String, Value>) -> (String, Value) {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.path().join("out.json");
        write_tree(&path, root).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let parsed = serde_json::from_str(&content).unwrap();
        (content, parsed)
    }

    #[test]
    fn test_nested_payload_round_trips_with_stringified_leaves() {
        let (_, parsed) = write_and_parse(&sample_tree());
        assert_eq!(parsed, json!({ "x": { "y": ["1", "2"] } }));
    }

    #[test]
    fn test_scalars_stringified() {
        let mut root = Map::new();
        root.insert("count".to_string(), json!(7));
        root.insert("ratio".to_string(), json!(2.5));
        root.insert("enabled".to_string(), json!(true));
        root.insert("label".to_string(), json!("plain"));
        root.insert("absent".to_string(), Value::Null);

        let (_, parsed) = write_and_parse(&root);
        assert_eq!(
            parsed,
            json!({
                "count": "7",
                "ratio": "2.5",
                "enabled": "true",
                "label": "plain",
                "absent": "null"
            })
        );
    }

    #[test]
    fn test_four_space_indentation() {
        let mut root = Map::new();
        root.insert("outer".to_string(), json!({ "inner": 1 }));

        let (content, _) = write_and_parse(&root);
        assert!(content.contains("\n    \"outer\""));
        assert!(content.contains("\n        \"inner\""));
    }

    #[test]
    fn test_null_inside_array_becomes_literal_string() {
        let mut root = Map::new();
        root.insert("values".to_string(), json!([null, 3, "x"]));

        let (_, parsed) = write_and_parse(&root);
        assert_eq!(parsed, json!({ "values": ["null", "3", "x"] }));
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let path = std::path::Path::new("/nonexistent-root-dir/out.json");
        assert!(write_tree(path, &sample_tree()).is_err());
    }
}
