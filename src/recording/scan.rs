//! Secret scanning over replayed output.
//!
//! Remote terminal sessions are supposed to be scrubbed of secrets typed at
//! hidden prompts (`passwd` and friends) before being persisted. The scan
//! checks the output stream a viewer would see for any of the given strings.
//! The stream is scanned as a whole, so a secret split across two frames is
//! still found.

use super::{Frame, Recording};

/// One occurrence of a secret in the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMatch {
    pub secret: String,
    /// Frame holding the first byte of the occurrence
    pub frame_index: usize,
    pub offset_ms: u64,
}

/// Outcome of a secret scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Whether the recording produced any visible output at all
    pub had_content: bool,
    pub matches: Vec<SecretMatch>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Scan a recording's output for secrets.
pub fn scan<S: AsRef<str>>(recording: &Recording, secrets: &[S]) -> ScanReport {
    let mut stream = Vec::with_capacity(recording.data_bytes());
    // (start position in stream, frame index)
    let mut starts = Vec::new();

    for (index, frame) in recording.frames().iter().enumerate() {
        if let Some(bytes) = frame.bytes() {
            starts.push((stream.len(), index));
            stream.extend_from_slice(bytes);
        }
    }

    let mut matches = Vec::new();
    for secret in secrets {
        let needle = secret.as_ref().as_bytes();
        if needle.is_empty() || needle.len() > stream.len() {
            continue;
        }

        for (pos, window) in stream.windows(needle.len()).enumerate() {
            if window != needle {
                continue;
            }
            let slot = starts.partition_point(|(start, _)| *start <= pos) - 1;
            let frame_index = starts[slot].1;
            matches.push(SecretMatch {
                secret: secret.as_ref().to_string(),
                frame_index,
                offset_ms: frame_offset(recording.frames(), frame_index),
            });
        }
    }

    matches.sort_by_key(|m| (m.frame_index, m.secret.clone()));
    tracing::debug!(
        secrets = secrets.len(),
        matches = matches.len(),
        "scanned recording for secrets"
    );

    ScanReport {
        had_content: !stream.is_empty(),
        matches,
    }
}

fn frame_offset(frames: &[Frame], index: usize) -> u64 {
    frames.get(index).map(|f| f.offset_ms).unwrap_or(0)
}
