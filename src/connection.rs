use std::net::SocketAddr;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Result;

pub struct Connection {
    pub id: Uuid,
    pub client_address: SocketAddr,
    // Data is read from the socket into the codec's buffer. When a frame is
    // parsed, the corresponding bytes are removed from the buffer.
    reader: FramedRead<OwnedReadHalf, FrameCodec>,
    writer: OwnedWriteHalf,
}

impl Connection {
    pub fn new(stream: TcpStream, client_address: SocketAddr) -> Connection {
        let (read_half, write_half) = stream.into_split();

        Connection {
            id: Uuid::new_v4(),
            client_address,
            reader: FramedRead::new(read_half, FrameCodec),
            writer: write_half,
        }
    }

    /// Reads the next frame, waiting until the peer has sent a whole one.
    /// `None` means the peer closed the connection cleanly between frames;
    /// closing it in the middle of a frame surfaces as an error.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        self.reader.next().await.transpose()
    }

    /// Serializes one reply onto the socket and flushes it, so a reply is
    /// never left sitting in a buffer between requests.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.writer.write_all(&frame.serialize()).await?;
        self.writer.flush().await?;

        Ok(())
    }
}
