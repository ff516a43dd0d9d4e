//! Append-only sample writer for crash-safe stream recording.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use stridesense_common::error::StrideResult;
use stridesense_motion_model::{AccelSample, SampleStreamHeader};

/// Writes samples to a JSONL file in append-only mode.
pub struct StreamWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    samples_written: u64,
}

impl StreamWriter {
    /// Create a new stream writer, writing the header as the first line.
    pub fn new(path: PathBuf, header: SampleStreamHeader) -> StrideResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);

        // Header rides as a comment line so the body stays line-parseable.
        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")?;

        Ok(Self {
            writer,
            path,
            samples_written: 0,
        })
    }

    /// Append one sample as a JSON line.
    pub fn write_sample(&mut self, sample: &AccelSample) -> StrideResult<()> {
        let json = serde_json::to_string(sample)?;
        writeln!(self.writer, "{json}")?;
        self.samples_written += 1;
        Ok(())
    }

    /// Flush buffered samples to disk.
    pub fn flush(&mut self) -> StrideResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of samples written so far.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Path of the stream file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stridesense_motion_model::parse_samples;

    fn header() -> SampleStreamHeader {
        SampleStreamHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: "2026-01-01T00:00:00Z".to_string(),
            sample_rate_hz: 10,
            source: "replay".to_string(),
        }
    }

    #[test]
    fn test_written_stream_parses_back() {
        let dir = std::env::temp_dir().join("stridesense-writer-test");
        let path = dir.join("stream.jsonl");

        let mut writer = StreamWriter::new(path.clone(), header()).unwrap();
        writer
            .write_sample(&AccelSample::new(0, 0.1, 0.0, -1.0))
            .unwrap();
        writer
            .write_sample(&AccelSample::new(100_000_000, 0.2, 0.1, -0.9))
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.samples_written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# "));
        let samples = parse_samples(&content).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].timestamp_ns, 100_000_000);

        std::fs::remove_dir_all(&dir).ok();
    }
}
