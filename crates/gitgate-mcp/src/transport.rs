//! Line-delimited stdio transport
//!
//! One JSON message per line in, one JSON response per line out. Responses
//! are flushed as soon as they are written so a client waiting on a reply is
//! never stuck behind a buffer.

use std::io::{self, BufRead, StdinLock, StdoutLock, Write};

use crate::Result;
use crate::server::GatewayServer;

/// Reads request lines from `R` and writes response lines to `W`.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<StdinLock<'static>, StdoutLock<'static>> {
    /// Transport over the process's own stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: BufRead, W: Write> StdioTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Next line without its terminator, or `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected; the
    /// resulting line then fails JSON parsing like any other garbage.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

/// Counters reported when the input stream ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    /// Lines received.
    pub lines: usize,
    /// Responses written.
    pub responses: usize,
    /// Messages dropped because of an internal fault.
    pub faults: usize,
}

/// Run the read-handle-respond loop until end of input.
///
/// Messages are handled strictly in arrival order, one at a time. Every
/// line is dispatched, so a blank one is answered with a parse error. An
/// internal fault on one message is logged and the loop moves on; only a
/// broken transport ends it early.
pub async fn serve<R: BufRead, W: Write>(
    server: &GatewayServer,
    transport: &mut StdioTransport<R, W>,
) -> Result<ServeStats> {
    let mut stats = ServeStats::default();

    while let Some(line) = transport.read_line()? {
        stats.lines += 1;
        tracing::debug!(message = %line, "Received message");

        match server.handle_message(&line).await {
            Ok(Some(response)) => {
                transport.write_line(&response)?;
                stats.responses += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to handle message");
                stats.faults += 1;
            }
        }
    }

    tracing::info!(
        lines = stats.lines,
        responses = stats.responses,
        "Input closed, shutting down"
    );
    Ok(stats)
}
