use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Sets `field` to `value` inside the hash named `hash`, creating the hash
/// on first use.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct Hset {
    pub hash: String,
    pub field: String,
    pub value: String,
}

impl Executable for Hset {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        store.hset(self.hash, self.field, self.value);
        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Hset {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(CommandParserError::WrongArity { command: "hset" }.into());
        }

        let hash = parser.next_string()?;
        let field = parser.next_string()?;
        let value = parser.next_string()?;

        Ok(Self { hash, field, value })
    }
}
