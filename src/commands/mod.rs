pub mod executable;
pub mod get;
pub mod hget;
pub mod hset;
pub mod ping;
pub mod set;

use bytes::Bytes;
use std::{str, vec};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use get::Get;
use hget::Hget;
use hset::Hset;
use ping::Ping;
use set::Set;

#[derive(Debug, PartialEq)]
pub enum Command {
    Get(Get),
    Hget(Hget),
    Hset(Hset),
    Ping(Ping),
    Set(Set),
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match self {
            Command::Get(cmd) => cmd.exec(store),
            Command::Hget(cmd) => cmd.exec(store),
            Command::Hset(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandParserError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands to the server as arrays of bulk strings.
        let frames = match frame {
            Frame::Array(array) => array,
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                })
            }
        };

        let mut parser = CommandParser {
            parts: frames.into_iter(),
            command: String::new(),
        };
        let command_name = parser.parse_command_name()?;
        let parser = &mut parser;

        let command = match &command_name[..] {
            "get" => Get::try_from(parser).map(Command::Get),
            "hget" => Hget::try_from(parser).map(Command::Hget),
            "hset" => Hset::try_from(parser).map(Command::Hset),
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "set" => Set::try_from(parser).map(Command::Set),
            _ => Err(CommandParserError::UnknownCommand {
                command: command_name.clone(),
            }),
        };

        // Running out of parts while a command still expects arguments is an
        // arity mistake from the client's point of view, not a frame
        // problem.
        command.map_err(|err| match err {
            CommandParserError::EndOfStream => CommandParserError::WrongArity {
                command: command_name,
            },
            err => err,
        })
    }
}

pub(crate) struct CommandParser {
    parts: vec::IntoIter<Frame>,
    command: String,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        let command_name = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        let command_name = match command_name {
            Frame::Simple(s) => s.to_lowercase(),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_lowercase())
                .map_err(CommandParserError::InvalidUTF8String)?,
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "simple or bulk string".to_string(),
                    actual: frame,
                })
            }
        };

        self.command = command_name.clone();

        Ok(command_name)
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            // Both `Simple` and `Bulk` representation may be strings. Strings are parsed to UTF-8.
            // While errors are stored as strings, they are considered separate types.
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Simple(s) => Ok(Bytes::from(s)),
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    /// Commands call this once their arguments are consumed; any part left
    /// over means the client sent too many.
    fn expect_end(&mut self) -> Result<(), CommandParserError> {
        match self.parts.next() {
            None => Ok(()),
            Some(_) => Err(CommandParserError::WrongArity {
                command: self.command.clone(),
            }),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("wrong number of arguments for '{command}'")]
    WrongArity { command: String },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}

impl CommandParserError {
    /// Mistakes the client can recover from are answered on the wire; the
    /// session loop closes the connection for everything else.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CommandParserError::UnknownCommand { .. } | CommandParserError::WrongArity { .. }
        )
    }
}
