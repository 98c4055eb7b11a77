//! Decoding of chat-completion event streams.
//!
//! Each line of the body is classified on its own. Lines that cannot be decoded
//! are skipped; they never end the stream. Only the termination sentinel does.

use bytes::BytesMut;
use serde::Deserialize;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Display-only marker appended to partial text while the stream is running.
pub const CURSOR: &str = "▌";

/// Classification of one line of the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEvent {
    Fragment(String),
    Skip,
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Classifies a single line: strips the `data:` prefix if present, recognises
/// the `[DONE]` sentinel, and extracts `choices[0].delta.content`.
pub fn parse_line(line: &str) -> ChunkEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line
        .strip_prefix(DATA_PREFIX)
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .unwrap_or(line);

    if payload.trim() == DONE_SENTINEL {
        return ChunkEvent::Done;
    }
    if payload.trim().is_empty() {
        return ChunkEvent::Skip;
    }

    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
            .map(ChunkEvent::Fragment)
            .unwrap_or(ChunkEvent::Skip),
        Err(e) => {
            tracing::debug!(error = %e, "skipping undecodable stream line");
            ChunkEvent::Skip
        }
    }
}

/// Running state of one streamed completion. Raw body chunks go in; complete
/// lines are split off and folded into the text. A line split across chunks
/// waits in `buffer` until its newline arrives.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    buffer: BytesMut,
    text: String,
    finished: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one body chunk. Returns the display text after each fragment the
    /// chunk completed, in order. Input after the sentinel is ignored.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut displays = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            if self.push_line(&String::from_utf8_lossy(&line)) {
                displays.push(self.display());
            }
            if self.finished {
                self.buffer.clear();
                break;
            }
        }
        displays
    }

    /// Flushes a final line that arrived without a trailing newline.
    /// Returns the display text if it carried a fragment.
    pub fn finish(&mut self) -> Option<String> {
        if self.finished || self.buffer.is_empty() {
            return None;
        }
        let tail = self.buffer.split();
        self.push_line(&String::from_utf8_lossy(&tail))
            .then(|| self.display())
    }

    fn push_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            ChunkEvent::Fragment(fragment) => {
                self.text.push_str(&fragment);
                true
            }
            ChunkEvent::Skip => false,
            ChunkEvent::Done => {
                self.finished = true;
                false
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Accumulated text with the cursor marker, for incremental display.
    pub fn display(&self) -> String {
        format!("{}{}", self.text, CURSOR)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
