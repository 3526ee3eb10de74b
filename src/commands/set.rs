use bytes::Bytes;
use tokio::time::Duration;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Sets `key` to `value`, replacing any previous entry and its expiry.
/// `EX`/`PX` attach a relative time-to-live.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub ttl: Option<Ttl>,
}

#[derive(Debug, PartialEq)]
pub enum Ttl {
    Ex(u64),
    Px(u64),
}

impl Ttl {
    pub fn duration(&self) -> Duration {
        match self {
            Ttl::Ex(seconds) => Duration::from_secs(*seconds),
            Ttl::Px(millis) => Duration::from_millis(*millis),
        }
    }
}

impl Executable for Set {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let ttl = self.ttl.as_ref().map(Ttl::duration);
        store.set(self.key, self.value, ttl);

        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() < 2 {
            return Err(CommandParserError::WrongArity { command: "set" }.into());
        }

        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        let mut ttl = None;

        loop {
            let option = match parser.next_string() {
                Ok(option) => option,
                Err(CommandParserError::EndOfStream) => break,
                Err(err) => return Err(err.into()),
            };

            match option.to_uppercase().as_str() {
                "EX" if ttl.is_none() => {
                    let val = parser.next_integer().map_err(not_an_integer)?;
                    ttl = Some(Ttl::Ex(val as u64));
                }
                "PX" if ttl.is_none() => {
                    let val = parser.next_integer().map_err(not_an_integer)?;
                    ttl = Some(Ttl::Px(val as u64));
                }
                _ => return Err(CommandParserError::Syntax.into()),
            }
        }

        Ok(Self { key, value, ttl })
    }
}

// A missing TTL value ("SET k v EX") reads better as a bad integer than as
// an end-of-stream protocol complaint.
fn not_an_integer(err: CommandParserError) -> CommandParserError {
    match err {
        CommandParserError::EndOfStream => CommandParserError::NotAnInteger,
        err => err,
    }
}
