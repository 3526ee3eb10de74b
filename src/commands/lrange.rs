use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns list elements `[start, end]`, both inclusive and 0-indexed from
/// the head. `end = -1` addresses the tail; an `end` past the tail is
/// clamped. An out-of-range `start` or an inverted range yields an empty
/// array.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct Lrange {
    pub key: String,
    pub start: i64,
    pub end: i64,
}

impl Executable for Lrange {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let elements = store.list_range(&self.key, self.start, self.end);
        Ok(Frame::Array(elements.into_iter().map(Frame::Bulk).collect()))
    }
}

impl TryFrom<&mut CommandParser> for Lrange {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(CommandParserError::WrongArity { command: "lrange" }.into());
        }

        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let end = parser.next_integer()?;

        Ok(Self { key, start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    fn lrange_cmd(key: &str, start: &str, end: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("LRANGE")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(start.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(end.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn full_range_head_to_tail() {
        let store = Store::new();
        store.push_back(
            "l",
            vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
        );

        let result = lrange_cmd("l", "0", "-1").exec(store).await.unwrap();

        assert_eq!(
            result,
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("a")),
                Frame::Bulk(Bytes::from("b")),
                Frame::Bulk(Bytes::from("c")),
            ])
        );
    }

    #[tokio::test]
    async fn out_of_range_start_is_empty_array() {
        let store = Store::new();
        store.push_back(
            "l",
            vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
        );

        let result = lrange_cmd("l", "5", "10").exec(store).await.unwrap();

        assert_eq!(result, Frame::Array(vec![]));
    }

    #[tokio::test]
    async fn absent_key_is_empty_array() {
        let result = lrange_cmd("ghost", "0", "-1")
            .exec(Store::new())
            .await
            .unwrap();

        assert_eq!(result, Frame::Array(vec![]));
    }

    #[test]
    fn non_numeric_index() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LRANGE")),
            Frame::Bulk(Bytes::from("l")),
            Frame::Bulk(Bytes::from("zero")),
            Frame::Bulk(Bytes::from("-1")),
        ]);
        let err = Command::try_from(frame).err().unwrap();
        let err = err.downcast_ref::<CommandParserError>().unwrap();

        assert_eq!(*err, CommandParserError::NotAnInteger);
    }
}
