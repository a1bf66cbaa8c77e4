use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::errors::GenerationError;
use crate::model::FixtureRecord;

/// Indentation used for fixture files.
pub const DEFAULT_INDENT: usize = 4;

/// Serialize records as a pretty-printed JSON array.
pub fn to_json_string(records: &[FixtureRecord], indent: usize) -> Result<String, GenerationError> {
    let mut buffer = Vec::new();
    write_json(&mut buffer, records, indent)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write records to `path`, returning the number of bytes written.
pub fn write_fixtures(
    path: &Path,
    records: &[FixtureRecord],
    indent: usize,
) -> Result<u64, GenerationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut counting = CountingWriter::new(BufWriter::new(File::create(path)?));
    write_json(&mut counting, records, indent)?;
    counting.write_all(b"\n")?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

fn write_json<W: Write>(
    writer: W,
    records: &[FixtureRecord],
    indent: usize,
) -> Result<(), GenerationError> {
    let indent = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    records.serialize(&mut serializer)?;
    Ok(())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn json_uses_requested_indent_and_key_order() {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("x"));
        let records = vec![FixtureRecord {
            pk: json!(1),
            model: "blog.Post".to_string(),
            fields,
        }];

        let json = to_json_string(&records, 4).expect("serialize");
        let expected = "[\n    {\n        \"pk\": 1,\n        \"model\": \"blog.Post\",\n        \"fields\": {\n            \"title\": \"x\"\n        }\n    }\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_fixture_list_is_empty_array() {
        assert_eq!(to_json_string(&[], 2).expect("serialize"), "[]");
    }
}
