//! Reading and writing counter configurations.
//!
//! JSON is the canonical format. YAML is accepted on read for hand-written
//! configs and chosen by file extension.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::CounterConfig;
use crate::error::LaneCountError;

/// Reads a counter configuration from a file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_config(path: &Path) -> Result<CounterConfig, LaneCountError> {
    let file = File::open(path).map_err(LaneCountError::Io)?;
    let reader = BufReader::new(file);

    if is_yaml_path(path) {
        serde_yaml::from_reader(reader).map_err(|source| LaneCountError::ConfigYamlParse {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_reader(reader).map_err(|source| LaneCountError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Writes a counter configuration to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_config(path: &Path, config: &CounterConfig) -> Result<(), LaneCountError> {
    let file = File::create(path).map_err(LaneCountError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config).map_err(|source| LaneCountError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a configuration from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<CounterConfig, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a configuration from JSON bytes.
///
/// Useful for fuzzing raw bytes without requiring UTF-8 upfront.
pub fn from_json_slice(bytes: &[u8]) -> Result<CounterConfig, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a configuration to a pretty-printed JSON string.
pub fn to_json_string(config: &CounterConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

/// Reads a configuration from a YAML string.
pub fn from_yaml_str(yaml: &str) -> Result<CounterConfig, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
