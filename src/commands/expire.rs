use tokio::time::Duration;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::{ExpireOption, Store};
use crate::Error;

/// Sets a time-to-live on an existing string key, optionally conditioned on
/// the key's current expiry. Returns 1 when the expiry was applied, 0
/// otherwise (including when the key does not exist).
///
/// Ref: <https://redis.io/docs/latest/commands/expire/>
#[derive(Debug, PartialEq)]
pub struct Expire {
    pub key: String,
    pub seconds: u64,
    pub option: Option<ExpireOption>,
}

impl Executable for Expire {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let applied = store.expire(&self.key, Duration::from_secs(self.seconds), self.option);
        Ok(Frame::Integer(applied as i64))
    }
}

impl TryFrom<&mut CommandParser> for Expire {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() < 2 || parser.remaining() > 3 {
            return Err(CommandParserError::WrongArity { command: "expire" }.into());
        }

        let key = parser.next_string()?;
        let seconds = parser.next_integer()?;
        if seconds < 0 {
            return Err(CommandParserError::NotAnInteger.into());
        }

        let option = match parser.next_string() {
            Ok(flag) => Some(match flag.to_uppercase().as_str() {
                "NX" => ExpireOption::Nx,
                "XX" => ExpireOption::Xx,
                "GT" => ExpireOption::Gt,
                "LT" => ExpireOption::Lt,
                _ => return Err(CommandParserError::Syntax.into()),
            }),
            Err(CommandParserError::EndOfStream) => None,
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            key,
            seconds: seconds as u64,
            option,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;
    use tokio::time;

    fn expire_cmd(args: &[&str]) -> Result<Command, Error> {
        let mut frames = vec![Frame::Bulk(Bytes::from("EXPIRE"))];
        frames.extend(
            args.iter()
                .map(|a| Frame::Bulk(Bytes::copy_from_slice(a.as_bytes()))),
        );
        Command::try_from(Frame::Array(frames))
    }

    #[test]
    fn parse_with_flag() {
        let cmd = expire_cmd(&["foo", "10", "nx"]).unwrap();
        assert_eq!(
            cmd,
            Command::Expire(Expire {
                key: "foo".to_string(),
                seconds: 10,
                option: Some(ExpireOption::Nx),
            })
        );
    }

    #[test]
    fn invalid_seconds() {
        let err = expire_cmd(&["foo", "soon"]).err().unwrap();
        let err = err.downcast_ref::<CommandParserError>().unwrap();
        assert_eq!(*err, CommandParserError::NotAnInteger);
    }

    #[test]
    fn invalid_flag() {
        let err = expire_cmd(&["foo", "10", "ZZ"]).err().unwrap();
        let err = err.downcast_ref::<CommandParserError>().unwrap();
        assert_eq!(*err, CommandParserError::Syntax);
    }

    #[test]
    fn wrong_arity() {
        for args in [&[][..], &["foo"][..], &["foo", "1", "NX", "extra"][..]] {
            let err = expire_cmd(args).err().unwrap();
            let err = err.downcast_ref::<CommandParserError>().unwrap();
            assert_eq!(*err, CommandParserError::WrongArity { command: "expire" });
        }
    }

    #[tokio::test]
    async fn missing_key_returns_zero() {
        let cmd = expire_cmd(&["ghost", "10"]).unwrap();
        let result = cmd.exec(Store::new()).await.unwrap();
        assert_eq!(result, Frame::Integer(0));
    }

    #[tokio::test(start_paused = true)]
    async fn applies_and_expires() {
        let store = Store::new();
        store.set("foo".to_string(), Bytes::from("bar"), None);

        let result = expire_cmd(&["foo", "10"])
            .unwrap()
            .exec(store.clone())
            .await
            .unwrap();
        assert_eq!(result, Frame::Integer(1));

        time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("foo"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn gt_flag_matrix() {
        let store = Store::new();
        store.set("k".to_string(), Bytes::from("v"), Some(Duration::from_secs(10)));

        // now + 5 is earlier than the current deadline, GT does not apply.
        let result = expire_cmd(&["k", "5", "GT"])
            .unwrap()
            .exec(store.clone())
            .await
            .unwrap();
        assert_eq!(result, Frame::Integer(0));

        // now + 15 is later, GT applies.
        let result = expire_cmd(&["k", "15", "GT"])
            .unwrap()
            .exec(store.clone())
            .await
            .unwrap();
        assert_eq!(result, Frame::Integer(1));
    }

    #[tokio::test]
    async fn xx_without_expiry_returns_zero() {
        let store = Store::new();
        store.set("k".to_string(), Bytes::from("v"), None);

        let result = expire_cmd(&["k", "10", "XX"])
            .unwrap()
            .exec(store)
            .await
            .unwrap();
        assert_eq!(result, Frame::Integer(0));
    }
}
