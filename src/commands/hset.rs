use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Set `field` in the hash stored at `key` to `value`. The hash is created
/// on the first write to any of its fields; an existing field is
/// overwritten.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct Hset {
    pub key: String,
    pub field: String,
    pub value: Bytes,
}

impl Executable for Hset {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        store.hset(self.key, self.field, self.value);

        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Hset {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_string()?;
        let value = parser.next_bytes()?;
        parser.expect_end()?;

        Ok(Self { key, field, value })
    }
}
