//! Async driver for [`ObjectScanner`]

use futures::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

use super::{ObjectScanner, ParseError, ScanSummary, ScannedObject};
use crate::config::ScanLimits;

/// Event emitted by [`ObjectStream`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A complete top-level object
    Object(ScannedObject),
    /// End of input; emitted exactly once after a well-formed array
    Finished,
}

impl ParseEvent {
    /// Whether this is the end-of-input event
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Extract the object, if any
    pub fn into_object(self) -> Option<ScannedObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Finished => None,
        }
    }
}

/// Pull-based object stream over a buffered async reader
///
/// Bytes are consumed from the reader only up to the end of the object being
/// returned, so a caller that stops after the first match leaves the rest of
/// the source unread.
pub struct ObjectStream<R> {
    reader: R,
    scanner: ObjectScanner,
    summary: Option<ScanSummary>,
    done: bool,
}

impl<R> ObjectStream<R>
where
    R: AsyncBufRead + Unpin,
{
    /// Create stream with default scan limits
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, ScanLimits::default())
    }

    /// Create stream with custom scan limits
    pub fn with_limits(reader: R, limits: ScanLimits) -> Self {
        Self {
            reader,
            scanner: ObjectScanner::with_limits(limits),
            summary: None,
            done: false,
        }
    }

    /// Next event, or `None` once the stream has ended
    ///
    /// After `Finished` or an error every further call returns `Ok(None)`.
    pub async fn next_event(&mut self) -> Result<Option<ParseEvent>, ParseError> {
        if self.done {
            return Ok(None);
        }

        match self.advance().await {
            Ok(event) => Ok(Some(event)),
            Err(err) => {
                self.done = true;
                Err(err)
            }
        }
    }

    /// Next object, skipping the `Finished` marker
    pub async fn next_object(&mut self) -> Result<Option<ScannedObject>, ParseError> {
        loop {
            match self.next_event().await? {
                Some(ParseEvent::Object(object)) => return Ok(Some(object)),
                Some(ParseEvent::Finished) => continue,
                None => return Ok(None),
            }
        }
    }

    /// Bytes consumed from the reader so far
    pub fn position(&self) -> u64 {
        self.scanner.position()
    }

    /// Totals, available after `Finished`
    pub fn summary(&self) -> Option<ScanSummary> {
        self.summary
    }

    /// Recover the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Convert into a `futures::Stream` of events
    pub fn into_events(mut self) -> impl Stream<Item = Result<ParseEvent, ParseError>> {
        async_stream::try_stream! {
            while let Some(event) = self.next_event().await? {
                yield event;
            }
        }
    }

    async fn advance(&mut self) -> Result<ParseEvent, ParseError> {
        loop {
            let chunk = self.reader.fill_buf().await?;

            if chunk.is_empty() {
                let summary = self.scanner.finish()?;
                trace!(
                    "Scan finished: {} objects in {} bytes",
                    summary.elements, summary.length
                );
                self.summary = Some(summary);
                self.done = true;
                return Ok(ParseEvent::Finished);
            }

            let feed = self.scanner.feed(chunk)?;
            self.reader.consume(feed.consumed);

            if let Some(object) = feed.object {
                return Ok(ParseEvent::Object(object));
            }
        }
    }
}
