use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the value of `field` in the hash named `hash`, or `nil` when the
/// hash or the field does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/hget/>
#[derive(Debug, PartialEq)]
pub struct Hget {
    pub hash: String,
    pub field: String,
}

impl Executable for Hget {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match store.hget(&self.hash, &self.field) {
            Some(value) => Ok(Frame::Bulk(Bytes::from(value))),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Hget {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(CommandParserError::WrongArity { command: "hget" }.into());
        }

        let hash = parser.next_string()?;
        let field = parser.next_string()?;

        Ok(Self { hash, field })
    }
}
