use bytes::Bytes;
use tokio::time::{self, Duration, Instant};

use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// How long a blocked caller sleeps between polls. Bounds the worst-case
/// wakeup latency after another connection pushes.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Pops the head of the first non-empty list among `keys`, suspending the
/// calling connection (and only it) until an element shows up or `timeout`
/// elapses. Replies `[key, value]` on success and `nil` on timeout.
/// A timeout of 0 checks once and returns immediately.
///
/// The keys are polled in the order given; no store lock is held while
/// suspended.
#[derive(Debug, PartialEq)]
pub struct Blpop {
    pub keys: Vec<String>,
    pub timeout: Duration,
}

impl Blpop {
    pub async fn exec(self, store: Store) -> Result<Frame, Error> {
        let deadline = (!self.timeout.is_zero()).then(|| Instant::now() + self.timeout);

        loop {
            if let Some((key, value)) = store.pop_front_any(&self.keys) {
                return Ok(Frame::Array(vec![
                    Frame::Bulk(Bytes::from(key)),
                    Frame::Bulk(value),
                ]));
            }

            let Some(deadline) = deadline else {
                return Ok(Frame::Null);
            };

            let now = Instant::now();
            if now >= deadline {
                return Ok(Frame::Null);
            }
            time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

impl TryFrom<&mut CommandParser> for Blpop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() < 2 {
            return Err(CommandParserError::WrongArity { command: "blpop" }.into());
        }

        // Every token but the last is a key; the last is the timeout in
        // seconds (fractions allowed).
        let mut keys = Vec::with_capacity(parser.remaining() - 1);
        while parser.remaining() > 1 {
            keys.push(parser.next_string()?);
        }

        let timeout = parser
            .next_string()?
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(Duration::from_secs_f64)
            .ok_or(CommandParserError::InvalidTimeout)?;

        Ok(Self { keys, timeout })
    }
}
