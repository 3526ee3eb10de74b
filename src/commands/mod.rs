pub mod blpop;
pub mod command;
pub mod del;
pub mod executable;
pub mod expire;
pub mod get;
pub mod hget;
pub mod hgetall;
pub mod hset;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod ping;
pub mod rpop;
pub mod rpush;
pub mod set;
pub mod unknown;

use bytes::Bytes;
use std::{str, vec};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use blpop::Blpop;
use command::Command as Command_;
use del::Del;
use expire::Expire;
use get::Get;
use hget::Hget;
use hgetall::Hgetall;
use hset::Hset;
use llen::Llen;
use lpop::Lpop;
use lpush::Lpush;
use lrange::Lrange;
use ping::Ping;
use rpop::Rpop;
use rpush::Rpush;
use set::Set;
use unknown::Unknown;

#[derive(Debug, PartialEq)]
pub enum Command {
    Blpop(Blpop),
    Del(Del),
    Expire(Expire),
    Get(Get),
    Hget(Hget),
    Hgetall(Hgetall),
    Hset(Hset),
    Llen(Llen),
    Lpop(Lpop),
    Lpush(Lpush),
    Lrange(Lrange),
    Ping(Ping),
    Rpop(Rpop),
    Rpush(Rpush),
    Set(Set),

    Command(Command_),
    Unknown(Unknown),
}

/// Whether executing a command must be recorded in the append-only file.
/// This is an explicit allow-list; read commands are `Never`, and commands
/// whose effect depends on the current state (a pop from an absent list, a
/// conditional expiry that did not apply) are logged only when the response
/// shows they changed something.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mutation {
    Never,
    Always,
    IfEffective,
}

impl Command {
    pub async fn exec(self, store: Store) -> Result<Frame, Error> {
        match self {
            // The one suspending command.
            Command::Blpop(cmd) => cmd.exec(store).await,

            Command::Del(cmd) => cmd.exec(store),
            Command::Expire(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Hget(cmd) => cmd.exec(store),
            Command::Hgetall(cmd) => cmd.exec(store),
            Command::Hset(cmd) => cmd.exec(store),
            Command::Llen(cmd) => cmd.exec(store),
            Command::Lpop(cmd) => cmd.exec(store),
            Command::Lpush(cmd) => cmd.exec(store),
            Command::Lrange(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::Rpop(cmd) => cmd.exec(store),
            Command::Rpush(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Command(cmd) => cmd.exec(store),
            Command::Unknown(cmd) => cmd.exec(store),
        }
    }

    pub fn mutation(&self) -> Mutation {
        match self {
            Command::Set(_) | Command::Hset(_) | Command::Lpush(_) | Command::Rpush(_) => {
                Mutation::Always
            }
            Command::Del(_) | Command::Expire(_) | Command::Lpop(_) | Command::Rpop(_) => {
                Mutation::IfEffective
            }
            _ => Mutation::Never,
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = Error;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands as arrays of bulk strings. A lone bulk
        // string is accepted as a one-token command; anything else at the
        // top level is a protocol error.
        let frames = match frame {
            Frame::Array(array) => array,
            Frame::Bulk(bytes) => vec![Frame::Bulk(bytes)],
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                }
                .into())
            }
        };

        let parser = &mut CommandParser {
            parts: frames.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        match &command_name[..] {
            "blpop" => Blpop::try_from(parser).map(Command::Blpop),
            "command" => Command_::try_from(parser).map(Command::Command),
            "del" => Del::try_from(parser).map(Command::Del),
            "expire" => Expire::try_from(parser).map(Command::Expire),
            "get" => Get::try_from(parser).map(Command::Get),
            "hget" => Hget::try_from(parser).map(Command::Hget),
            "hgetall" => Hgetall::try_from(parser).map(Command::Hgetall),
            "hset" => Hset::try_from(parser).map(Command::Hset),
            "llen" => Llen::try_from(parser).map(Command::Llen),
            "lpop" => Lpop::try_from(parser).map(Command::Lpop),
            "lpush" => Lpush::try_from(parser).map(Command::Lpush),
            "lrange" => Lrange::try_from(parser).map(Command::Lrange),
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "rpop" => Rpop::try_from(parser).map(Command::Rpop),
            "rpush" => Rpush::try_from(parser).map(Command::Rpush),
            "set" => Set::try_from(parser).map(Command::Set),
            _ => Ok(Command::Unknown(Unknown { name: command_name })),
        }
    }
}

pub struct CommandParser {
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        let command_name = self.parts.next().ok_or(CommandParserError::EmptyRequest)?;

        // Request tokens are bulk strings; any other element shape is a
        // protocol-level violation, not a command error.
        match command_name {
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_lowercase())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_integer(&mut self) -> Result<i64, CommandParserError> {
        let string = self.next_string()?;
        string
            .parse::<i64>()
            .map_err(|_| CommandParserError::NotAnInteger)
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    /// Number of argument tokens not yet consumed.
    fn remaining(&self) -> usize {
        self.parts.len()
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("protocol error; empty request")]
    EmptyRequest,
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity { command: &'static str },
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("ERR timeout is not a float or out of range")]
    InvalidTimeout,
    #[error("ERR syntax error")]
    Syntax,
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}

impl CommandParserError {
    /// Protocol-level violations are fatal to the connection. Everything
    /// else is reported to the client as an error frame and the connection
    /// stays open.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            CommandParserError::InvalidFrame { .. }
                | CommandParserError::EmptyRequest
                | CommandParserError::InvalidUTF8String(_)
        )
    }
}
