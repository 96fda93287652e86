use futures::StreamExt;
use reqwest::Response;

use super::buffering::CircularLineBuffer;
use crate::error::{ProviderError, Result};
use crate::streaming::StreamEvent;
use crate::traits::EventStream;

/// Strategy pattern for parsing different SSE response types
pub trait SseLineParser: Send {
    /// Provider name for error messages
    fn provider(&self) -> &'static str;

    /// Parse a data line into stream events
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    /// Check if this line signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// What a single SSE line means to the parser loop
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseLine<'a> {
    Data(&'a str),
    Ignored,
}

/// Classify a trimmed SSE line: `data:` payloads are returned, while blank
/// lines, `:` comments and the other SSE fields are skipped. Bare JSON lines
/// (some OpenAI-compatible gateways omit the `data:` prefix) count as data.
pub(crate) fn classify_line(line: &str) -> SseLine<'_> {
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Ignored;
    }
    if let Some(data) = line.strip_prefix("data:") {
        return SseLine::Data(data.trim_start());
    }
    if line.starts_with("event:") || line.starts_with("id:") || line.starts_with("retry:") {
        return SseLine::Ignored;
    }
    SseLine::Data(line)
}

/// Generic SSE stream parser using circular buffer
/// Applies strategy pattern for different response types.
///
/// The returned stream always ends with exactly one `Done` event unless an
/// error is yielded first.
pub fn parse_sse_stream<P: SseLineParser + 'static>(response: Response, parser: P) -> EventStream {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut upstream_open = true;

        loop {
            let line_result = match buffer.next_line() {
                Some(line) => line,
                None if upstream_open => {
                    match byte_chunks.next().await {
                        Some(Ok(bytes)) => {
                            buffer.extend(&bytes);
                            continue;
                        }
                        Some(Err(e)) => {
                            yield Err(ProviderError::network(parser.provider(), e));
                            return;
                        }
                        None => {
                            upstream_open = false;
                            continue;
                        }
                    }
                }
                None => match buffer.take_remaining() {
                    Some(line) => line,
                    None => break,
                },
            };

            let line = match line_result {
                Ok(line) => line,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let data = match classify_line(&line) {
                SseLine::Data(data) => data,
                SseLine::Ignored => continue,
            };

            if parser.is_done_marker(data) {
                break;
            }

            match parser.parse_data_line(data) {
                Ok(events) => {
                    for event in events {
                        let is_done = matches!(event, StreamEvent::Done { .. });
                        yield Ok(event);
                        if is_done {
                            return;
                        }
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        yield Ok(StreamEvent::Done { finish_reason: None });
    })
}
