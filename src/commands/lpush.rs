use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Pushes a value onto the head of the list at `key`, creating the list on
/// first use. Returns the new length.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct Lpush {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Lpush {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let len = store.push_front(&self.key, self.value);
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Lpush {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(CommandParserError::WrongArity { command: "lpush" }.into());
        }

        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn lpush_cmd(key: &str, value: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("LPUSH")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(value.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn returns_new_length() {
        let store = Store::new();

        let result = lpush_cmd("l", "1").exec(store.clone()).await.unwrap();
        assert_eq!(result, Frame::Integer(1));

        let result = lpush_cmd("l", "2").exec(store.clone()).await.unwrap();
        assert_eq!(result, Frame::Integer(2));

        // Most recently pushed value sits at the head.
        assert_eq!(store.pop_front("l", 1), vec![Bytes::from("2")]);
    }

    #[test]
    fn wrong_arity() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LPUSH")),
            Frame::Bulk(Bytes::from("l")),
        ]);
        let err = Command::try_from(frame).err().unwrap();
        let err = err.downcast_ref::<CommandParserError>().unwrap();

        assert_eq!(*err, CommandParserError::WrongArity { command: "lpush" });
    }
}
