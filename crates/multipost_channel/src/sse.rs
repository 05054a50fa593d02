/// One dispatched server-sent event: a name plus its joined data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub name: String,
    pub data: String,
}

/// Incremental server-sent-events parser.
///
/// Feed it raw body chunks as they arrive; it buffers partial lines across
/// chunk boundaries and yields frames as their terminating blank line shows
/// up. Field handling follows the wire format: `event:` names the frame,
/// `data:` lines accumulate and join with newlines, `:` comment lines and
/// unknown fields (`id:`, `retry:`) are skipped, and a single space after
/// the field colon is stripped. CRLF line endings are tolerated.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    name: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one body chunk and returns every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let mut line = &line[..line.len() - 1];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            let line = String::from_utf8_lossy(line);
            if let Some(frame) = self.take_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn take_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.name = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let name = self.name.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseFrame {
            name: name.unwrap_or_else(|| "message".to_string()),
            data: self.data.drain(..).collect::<Vec<_>>().join("\n"),
        })
    }
}
