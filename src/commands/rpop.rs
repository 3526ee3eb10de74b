use crate::commands::executable::Executable;
use crate::commands::lpop::{parse_pop_args, pop_reply};
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Pops up to `count` elements (default 1) from the tail of the list at
/// `key`. Reply shape matches `LPOP`.
///
/// Ref: <https://redis.io/docs/latest/commands/rpop/>
#[derive(Debug, PartialEq)]
pub struct Rpop {
    pub key: String,
    pub count: usize,
}

impl Executable for Rpop {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        Ok(pop_reply(store.pop_back(&self.key, self.count)))
    }
}

impl TryFrom<&mut CommandParser> for Rpop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parse_pop_args(parser, "rpop").map(|(key, count)| Self { key, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    fn rpop_cmd(args: &[&str]) -> Command {
        let mut frames = vec![Frame::Bulk(Bytes::from("RPOP"))];
        frames.extend(
            args.iter()
                .map(|a| Frame::Bulk(Bytes::copy_from_slice(a.as_bytes()))),
        );
        Command::try_from(Frame::Array(frames)).unwrap()
    }

    #[tokio::test]
    async fn pops_from_the_tail() {
        let store = Store::new();
        store.push_back("l", vec![Bytes::from("a"), Bytes::from("b")]);

        let result = rpop_cmd(&["l"]).exec(store.clone()).await.unwrap();
        assert_eq!(result, Frame::Bulk(Bytes::from("b")));

        let result = rpop_cmd(&["l"]).exec(store.clone()).await.unwrap();
        assert_eq!(result, Frame::Bulk(Bytes::from("a")));

        let result = rpop_cmd(&["l"]).exec(store).await.unwrap();
        assert_eq!(result, Frame::Null);
    }

    #[tokio::test]
    async fn multi_pop_in_pop_order() {
        let store = Store::new();
        store.push_back(
            "l",
            vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
        );

        let result = rpop_cmd(&["l", "2"]).exec(store).await.unwrap();

        // Pop order from the tail: c first, then b.
        assert_eq!(
            result,
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("c")),
                Frame::Bulk(Bytes::from("b")),
            ])
        );
    }
}
