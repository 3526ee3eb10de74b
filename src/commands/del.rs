use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes the given keys from the string container, returning how many
/// actually existed. Keys whose time-to-live has already elapsed are not
/// counted. Hashes and lists live in their own namespaces and are not
/// touched.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Executable for Del {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let mut count = 0;
        for key in self.keys {
            if store.remove(&key) {
                count += 1;
            }
        }
        Ok(Frame::Integer(count))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandParserError::EndOfStream) if !keys.is_empty() => break,
                Err(CommandParserError::EndOfStream) => {
                    return Err(CommandParserError::WrongArity { command: "del" }.into())
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { keys })
    }
}
