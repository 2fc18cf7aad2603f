//! Deserialization types for `ffprobe -print_format json` output.
//!
//! Only `streams[].codec_type` and `streams[].disposition.attached_pic` are
//! consumed. Everything else in the document (chapters, format, the many
//! per-stream fields) is ignored by serde.

use crate::probe::StreamCounts;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top level ffprobe document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
}

/// One entry of the `streams` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub disposition: FfprobeDisposition,
}

/// Disposition flags of a stream. ffprobe prints them as integers, older
/// wrappers as `"0"`/`"1"` strings; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeDisposition {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub attached_pic: bool,
}

impl FfprobeStream {
    fn is_type(&self, codec_type: &str) -> bool {
        self.codec_type.as_deref() == Some(codec_type)
    }

    /// A video stream that is really a still image (e.g. embedded cover art).
    pub fn is_attached_picture(&self) -> bool {
        self.is_type("video") && self.disposition.attached_pic
    }
}

impl FfprobeOutput {
    /// Reduces the stream list to a count triple. Attached pictures are not
    /// counted as video so the result matches the embedded backend.
    pub fn stream_counts(&self) -> StreamCounts {
        let mut counts = StreamCounts::ZERO;
        for stream in &self.streams {
            match stream.codec_type.as_deref() {
                Some("video") if !stream.disposition.attached_pic => counts.video += 1,
                Some("audio") => counts.audio += 1,
                Some("subtitle") => counts.subtitle += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn attached_picture_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_attached_picture()).count()
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            { "index": 0, "codec_name": "h264", "codec_type": "video",
              "disposition": { "default": 1, "attached_pic": 0 } },
            { "index": 1, "codec_name": "aac", "codec_type": "audio",
              "disposition": { "default": 1, "attached_pic": 0 } },
            { "index": 2, "codec_name": "mov_text", "codec_type": "subtitle" },
            { "index": 3, "codec_name": "mjpeg", "codec_type": "video",
              "disposition": { "default": 0, "attached_pic": 1 } },
            { "index": 4, "codec_type": "data" }
        ],
        "chapters": [],
        "format": { "filename": "x.mp4", "nb_streams": 5 }
    }"#;

    #[test]
    fn test_counts_exclude_attached_pictures() {
        let output: FfprobeOutput = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(output.streams.len(), 5);
        assert_eq!(output.stream_counts(), StreamCounts::new(1, 1, 1));
        assert_eq!(output.attached_picture_count(), 1);
    }

    #[test]
    fn test_string_disposition_flags() {
        let json = r#"{"streams": [
            {"codec_type": "video", "disposition": {"attached_pic": "1"}},
            {"codec_type": "video", "disposition": {"attached_pic": "0"}}
        ]}"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.stream_counts(), StreamCounts::new(1, 0, 0));
    }

    #[test]
    fn test_missing_streams_array_means_no_streams() {
        let output: FfprobeOutput = serde_json::from_str("{}").unwrap();
        assert_eq!(output.stream_counts(), StreamCounts::ZERO);
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let result = serde_json::from_str::<FfprobeOutput>(r#"{"streams": [ {"codec_type": "vid"#);
        assert!(result.is_err());
    }
}
