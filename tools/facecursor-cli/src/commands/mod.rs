pub mod calibrate;
pub mod config;
pub mod replay;

use std::path::Path;

use anyhow::Context;
use facecursor_face_model::record::{parse_header, StreamHeader};

/// Read a frames JSONL file and its optional `#` header.
pub(crate) fn read_recording(path: &Path) -> anyhow::Result<(String, Option<StreamHeader>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Frames file not found: {}", path.display()))?;
    let header = parse_header(&content)
        .transpose()
        .with_context(|| format!("Invalid header in {}", path.display()))?;
    Ok((content, header))
}
