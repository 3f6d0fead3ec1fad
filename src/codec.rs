use bytes::{Buf, BytesMut};
use std::convert::TryInto;
use std::env;
use std::io::Cursor;
use tokio_util::codec::Decoder;

use crate::frame::{self, Frame};
use crate::Error;

/// Adapts [`Frame::parse`] to an incrementally filled read buffer. While the
/// buffer holds less than one whole frame, `decode` returns `Ok(None)` and
/// the transport reads more bytes; on success exactly the decoded frame's
/// bytes are removed from the buffer, leaving any pipelined follow-up
/// request in place.
pub struct FrameCodec;

impl FrameCodec {
    fn max_frame_size() -> usize {
        env::var("MAX_FRAME_SIZE")
            .map(|s| s.parse().expect("MAX_FRAME_SIZE must be a number"))
            .unwrap_or(512 * 1024 * 1024)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // A peer streaming an endless frame would otherwise grow the buffer
        // without bound.
        if src.len() > FrameCodec::max_frame_size() {
            return Err("frame size exceeds limit".into());
        }

        let mut cursor = Cursor::new(&src[..]);
        let frame = match Frame::parse(&mut cursor) {
            Ok(frame) => frame,
            Err(frame::Error::Incomplete) => return Ok(None), // Not enough data to parse a frame.
            Err(err) => return Err(err.into()),
        };

        let position: usize = cursor
            .position()
            .try_into()
            .expect("Cursor position is too large");

        // Remove the parsed frame from the buffer.
        src.advance(position);

        Ok(Some(frame))
    }

    // A closed stream with an empty buffer is a clean end-of-stream; leftover
    // bytes mean the peer went away in the middle of a frame, which is a
    // protocol failure rather than a silent close.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err("connection closed in the middle of a frame".into()),
        }
    }
}
