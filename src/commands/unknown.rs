use tracing::debug;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Any command token outside the supported surface. Acknowledged with an
/// empty success response rather than an error so that clients probing the
/// connection (hello banners, feature sniffing) keep working.
#[derive(Debug, PartialEq)]
pub struct Unknown {
    pub name: String,
}

impl Executable for Unknown {
    fn exec(self, _store: Store) -> Result<Frame, Error> {
        debug!("Unsupported command: {}", self.name);
        Ok(Frame::Simple("".to_string()))
    }
}
