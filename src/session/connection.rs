//! Client connection loop

use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::Session;
use crate::protocol::{self, MAX_COMMAND_LINE, Response, codes};

/// Per-connection settings shared by all clients
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub greeting: String,
    /// Close clients idle this long; zero disables the timeout
    pub idle_timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            greeting: protocol::DEFAULT_GREETING.to_string(),
            idle_timeout: Duration::ZERO,
        }
    }
}

/// Serve one client until QUIT, EOF, idle timeout or server shutdown
///
/// Sends the greeting, then reads one command line at a time and writes
/// the complete response before reading the next.
pub async fn handle_client<R, W>(
    mut reader: R,
    mut writer: W,
    mut session: Session,
    options: &ConnectionOptions,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let client = session.client();
    protocol::greeting(&options.greeting)
        .write_to(&mut writer)
        .await?;

    let mut line = Vec::with_capacity(MAX_COMMAND_LINE);
    loop {
        line.clear();

        let read = tokio::select! {
            result = read_command(&mut reader, &mut line, options.idle_timeout) => result,
            _ = shutdown.recv() => {
                debug!("Client {} closed for server shutdown", client);
                Response::new(codes::SERVICE_UNAVAILABLE, "Server shutting down")
                    .write_to(&mut writer)
                    .await?;
                return Ok(());
            }
        };

        match read {
            Ok(0) => {
                debug!("Client {} disconnected", client);
                return Ok(());
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                info!("Client {} idle for {:?}, closing", client, options.idle_timeout);
                Response::new(codes::SERVICE_UNAVAILABLE, "Idle timeout, closing connection")
                    .write_to(&mut writer)
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        session.handle_line(&line).write_to(&mut writer).await?;

        if session.is_closing() {
            debug!("Client {} sent QUIT", client);
            return Ok(());
        }
    }
}

/// Read one command line into `buf`, bounded by the idle timeout
async fn read_command<R>(reader: &mut R, buf: &mut Vec<u8>, idle: Duration) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    if idle.is_zero() {
        return read_bounded_line(reader, buf).await;
    }
    match tokio::time::timeout(idle, read_bounded_line(reader, buf)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(ErrorKind::TimedOut, "client idle")),
    }
}

/// Read up to one octet past the line limit
///
/// An overlong line is kept truncated in `buf` (so parsing reports it) and
/// the rest of it is discarded from the stream.
async fn read_bounded_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_COMMAND_LINE as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if n as u64 == limit && buf.last() != Some(&b'\n') {
        let mut discard = Vec::new();
        loop {
            discard.clear();
            let m = (&mut *reader).take(4096).read_until(b'\n', &mut discard).await?;
            if m == 0 || discard.last() == Some(&b'\n') {
                break;
            }
        }
    }
    Ok(n)
}
