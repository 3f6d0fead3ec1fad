use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the value of `field` in the hash stored at `key`. A missing hash and
/// a missing field both resolve to `nil`, mirroring GET on an absent key.
///
/// Ref: <https://redis.io/docs/latest/commands/hget/>
#[derive(Debug, PartialEq)]
pub struct Hget {
    pub key: String,
    pub field: String,
}

impl Executable for Hget {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match store.hget(&self.key, &self.field) {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Hget {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_string()?;
        parser.expect_end()?;

        Ok(Self { key, field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn existing_field() {
        let store = Store::new();
        store.hset(
            String::from("users"),
            String::from("u1"),
            Bytes::from("Ana"),
        );

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HGET")),
            Frame::Bulk(Bytes::from("users")),
            Frame::Bulk(Bytes::from("u1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Hget(Hget {
                key: String::from("users"),
                field: String::from("u1")
            })
        );

        let result = cmd.exec(store).unwrap();

        assert_eq!(result, Frame::Bulk(Bytes::from("Ana")));
    }

    #[test]
    fn missing_outer_key() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HGET")),
            Frame::Bulk(Bytes::from("users")),
            Frame::Bulk(Bytes::from("u1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(Store::new()).unwrap();

        assert_eq!(result, Frame::Null);
    }

    #[test]
    fn missing_field() {
        let store = Store::new();
        store.hset(
            String::from("users"),
            String::from("u1"),
            Bytes::from("Ana"),
        );

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HGET")),
            Frame::Bulk(Bytes::from("users")),
            Frame::Bulk(Bytes::from("u2")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(store).unwrap();

        assert_eq!(result, Frame::Null);
    }

    #[test]
    fn without_field() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HGET")),
            Frame::Bulk(Bytes::from("users")),
        ]);

        let err = Command::try_from(frame).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::WrongArity {
                command: String::from("hget")
            }
        );
    }
}
