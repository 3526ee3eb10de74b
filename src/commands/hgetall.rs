use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns all field/value pairs of a hash as a flat array of alternating
/// bulk strings, or `nil` when the hash does not exist. Pair order is
/// unspecified.
///
/// Ref: <https://redis.io/docs/latest/commands/hgetall/>
#[derive(Debug, PartialEq)]
pub struct Hgetall {
    pub hash: String,
}

impl Executable for Hgetall {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let Some(pairs) = store.hgetall(&self.hash) else {
            return Ok(Frame::Null);
        };

        let mut frames = Vec::with_capacity(pairs.len() * 2);
        for (field, value) in pairs {
            frames.push(Frame::Bulk(Bytes::from(field)));
            frames.push(Frame::Bulk(Bytes::from(value)));
        }

        Ok(Frame::Array(frames))
    }
}

impl TryFrom<&mut CommandParser> for Hgetall {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(CommandParserError::WrongArity { command: "hgetall" }.into());
        }

        let hash = parser.next_string()?;
        Ok(Self { hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn hgetall_cmd(hash: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("HGETALL")),
            Frame::Bulk(Bytes::copy_from_slice(hash.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn missing_hash_is_null() {
        let result = hgetall_cmd("ghost").exec(Store::new()).await.unwrap();
        assert_eq!(result, Frame::Null);
    }

    #[tokio::test]
    async fn alternating_field_value_pairs() {
        let store = Store::new();
        store.hset("h".to_string(), "f1".to_string(), "v1".to_string());
        store.hset("h".to_string(), "f2".to_string(), "v2".to_string());

        let result = hgetall_cmd("h").exec(store).await.unwrap();

        let Frame::Array(frames) = result else {
            panic!("expected array, got {:?}", result);
        };
        assert_eq!(frames.len(), 4);

        // Map iteration order is unspecified; compare as sorted pairs.
        let mut pairs: Vec<(Frame, Frame)> = frames
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        pairs.sort_by_key(|(field, _)| format!("{}", field));

        assert_eq!(
            pairs,
            vec![
                (
                    Frame::Bulk(Bytes::from("f1")),
                    Frame::Bulk(Bytes::from("v1"))
                ),
                (
                    Frame::Bulk(Bytes::from("f2")),
                    Frame::Bulk(Bytes::from("v2"))
                ),
            ]
        );
    }
}
