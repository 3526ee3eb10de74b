use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Pops up to `count` elements (default 1) from the head of the list at
/// `key`. Replies `nil` when the list is absent or empty, a single bulk
/// string when exactly one element popped, and an array in pop order
/// otherwise.
///
/// Ref: <https://redis.io/docs/latest/commands/lpop/>
#[derive(Debug, PartialEq)]
pub struct Lpop {
    pub key: String,
    pub count: usize,
}

impl Executable for Lpop {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        Ok(pop_reply(store.pop_front(&self.key, self.count)))
    }
}

impl TryFrom<&mut CommandParser> for Lpop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parse_pop_args(parser, "lpop").map(|(key, count)| Self { key, count })
    }
}

/// Shared reply shape for `LPOP`/`RPOP`.
pub(super) fn pop_reply(popped: Vec<Bytes>) -> Frame {
    match popped.len() {
        0 => Frame::Null,
        1 => Frame::Bulk(popped.into_iter().next().expect("length checked")),
        _ => Frame::Array(popped.into_iter().map(Frame::Bulk).collect()),
    }
}

pub(super) fn parse_pop_args(
    parser: &mut CommandParser,
    command: &'static str,
) -> Result<(String, usize), Error> {
    if parser.remaining() < 1 || parser.remaining() > 2 {
        return Err(CommandParserError::WrongArity { command }.into());
    }

    let key = parser.next_string()?;

    let count = match parser.next_integer() {
        Ok(count) if count > 0 => count as usize,
        Ok(_) => return Err(CommandParserError::NotAnInteger.into()),
        Err(CommandParserError::EndOfStream) => 1,
        Err(err) => return Err(err.into()),
    };

    Ok((key, count))
}
