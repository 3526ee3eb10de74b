use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// The `COMMAND` handshake sent by generic clients on connect. Acknowledged
/// with an empty success response; the introspection tables are not
/// implemented.
#[derive(Debug, PartialEq)]
pub struct Command {}

impl Executable for Command {
    fn exec(self, _store: Store) -> Result<Frame, Error> {
        Ok(Frame::Simple("".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Command {
    type Error = Error;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        // Subcommands like `COMMAND DOCS` are acknowledged the same way.
        Ok(Self {})
    }
}
