//! Recorded frame streams in JSON Lines format.
//!
//! Each non-blank line holds one [`Frame`]:
//!
//! ```text
//! {"frame": 1, "segments": [{"id": 7, "type": 2, "prev": [-1, 5], "curr": [1, 5]}]}
//! {"frame": 2, "segments": []}
//! ```
//!
//! This is how tracker output is captured for offline replay and tests; the
//! live pipeline hands frames to the counter directly.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LaneCountError;
use crate::model::Frame;

/// Reads every frame from a JSON Lines file.
///
/// # Errors
/// Returns an error if the file cannot be read or a line fails to parse; the
/// error carries the 1-based line number.
pub fn read_frames(path: &Path) -> Result<Vec<Frame>, LaneCountError> {
    let file = File::open(path).map_err(LaneCountError::Io)?;
    parse_frames(BufReader::new(file), path)
}

/// Reads frames from an in-memory JSON Lines string.
///
/// Useful for testing without file I/O.
pub fn from_jsonl_str(input: &str) -> Result<Vec<Frame>, LaneCountError> {
    parse_frames(input.as_bytes(), Path::new("<string>"))
}

/// Reads frames from raw bytes.
///
/// Useful for fuzzing.
pub fn from_jsonl_slice(bytes: &[u8]) -> Result<Vec<Frame>, LaneCountError> {
    parse_frames(bytes, Path::new("<bytes>"))
}

fn parse_frames<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Frame>, LaneCountError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(LaneCountError::Io)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame: Frame =
            serde_json::from_str(trimmed).map_err(|source| LaneCountError::FrameParse {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MotionSegment, ObjectId};

    #[test]
    fn test_parse_with_blank_lines() {
        let input = r#"
{"frame": 1, "segments": [{"id": 7, "type": 2, "prev": [-1, 5], "curr": [1, 5]}]}

{"segments": []}
"#;
        let frames = from_jsonl_str(input).expect("parse");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].frame, Some(1));
        assert_eq!(
            frames[0].segments,
            vec![MotionSegment::new(7u64, 2u32, (-1, 5), (1, 5))]
        );
        assert_eq!(frames[0].segments[0].object_id, ObjectId(7));
        assert!(frames[1].segments.is_empty());
    }

    #[test]
    fn test_error_reports_line_number() {
        let input = "{\"segments\": []}\n{\"segments\": [{\"id\": 1}]}\n";
        let err = from_jsonl_str(input).unwrap_err();
        assert!(matches!(err, LaneCountError::FrameParse { line: 2, .. }));
    }
}
