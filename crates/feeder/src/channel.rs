use std::time::Duration;

use anyhow::Result;
use scrib_driver::Channel;
use scrib_protocol::Frame;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::Instant;

/// A live robot at the far end of a TCP socket. Frames go out as raw
/// three-byte writes; nothing ever comes back.
pub struct TcpChannel {
    addr: String,
    stream: TcpStream,
}

impl TcpChannel {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        log::info!("connected to {addr}");
        Ok(TcpChannel {
            addr: addr.to_owned(),
            stream,
        })
    }
}

impl Channel for TcpChannel {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        let buf = frame.to_bytes();
        let mut backoff = Duration::from_millis(10);
        for _ in 0..4 {
            match self.stream.write_all(&buf).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    log::warn!("connection error: {e}, reconnecting...");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    self.stream = TcpStream::connect(&self.addr).await?;
                }
            }
        }
        Ok(self.stream.write_all(&buf).await?)
    }
}

/// Stands in for the robot when no address is given. Frames are logged
/// with their offset from the start of the run and kept, so a dry run
/// shows exactly what would have gone over the wire.
pub struct SimulatorChannel {
    start: Instant,
    pub frames: Vec<(Duration, Frame)>,
}

impl SimulatorChannel {
    pub fn new() -> Self {
        SimulatorChannel {
            start: Instant::now(),
            frames: Vec::new(),
        }
    }
}

impl Channel for SimulatorChannel {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        let at = self.start.elapsed();
        log::info!(
            "[{:>9.2?}] wheels l {:>3} r {:>3}",
            at,
            frame.left,
            frame.right
        );
        self.frames.push((at, frame));
        Ok(())
    }
}
