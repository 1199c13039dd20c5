//! Line-delimited JSON-RPC connection loop.
//!
//! Reads one message per line from the reader, answers on the writer and
//! returns when the peer closes its side. Any I/O failure on the channel,
//! in either direction, ends the loop with an error.
//!
//! With `max_in_flight == 1` each request is answered before the next line
//! is read. With a larger limit every request runs on its own task, at most
//! `max_in_flight` at a time, and a single writer task serialises the
//! responses in completion order.

use std::sync::Arc;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

use super::codec::FrameCodec;
use super::session::McpSession;
use super::{TransportError, TransportResult};
use crate::core::protocol::JsonRpcResponse;

/// Serve one connection until end of input.
pub async fn serve_connection<R, W>(
    session: McpSession,
    reader: R,
    writer: W,
    max_in_flight: usize,
) -> TransportResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let frames = FramedRead::new(reader, FrameCodec::new());
    if max_in_flight <= 1 {
        serve_sequential(session, frames, writer).await
    } else {
        serve_concurrent(session, frames, writer, max_in_flight).await
    }
}

async fn serve_sequential<R, W>(
    session: McpSession,
    mut frames: FramedRead<R, FrameCodec>,
    mut writer: W,
) -> TransportResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.next().await {
        if let Some(response) = session.handle(frame?).await {
            write_response(&mut writer, &response).await?;
        }
    }

    info!("Peer closed the connection");
    Ok(())
}

/// Why the concurrent read loop stopped.
enum Stop {
    EndOfInput,
    ReadFailed(TransportError),
    WriterStopped(Result<TransportResult<()>, JoinError>),
}

async fn serve_concurrent<R, W>(
    session: McpSession,
    mut frames: FramedRead<R, FrameCodec>,
    writer: W,
    max_in_flight: usize,
) -> TransportResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(max_in_flight);
    let mut writer_task = tokio::spawn(write_loop(writer, rx));
    let permits = Arc::new(Semaphore::new(max_in_flight));
    let mut tasks = JoinSet::new();

    let stop = loop {
        let next = tokio::select! {
            next = frames.next() => next,
            joined = &mut writer_task => break Stop::WriterStopped(joined),
        };
        let frame = match next {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => break Stop::ReadFailed(e),
            None => break Stop::EndOfInput,
        };

        // Reap finished tasks so the set does not grow with the session.
        while let Some(joined) = tasks.try_join_next() {
            log_task_result(joined);
        }

        let permit = tokio::select! {
            permit = Arc::clone(&permits).acquire_owned() => permit,
            joined = &mut writer_task => break Stop::WriterStopped(joined),
        };
        let Ok(permit) = permit else {
            break Stop::ReadFailed(TransportError::connection("request limiter closed"));
        };

        let session = session.clone();
        let tx = tx.clone();
        tasks.spawn(async move {
            let _permit = permit;
            if let Some(response) = session.handle(frame).await {
                if tx.send(response).await.is_err() {
                    debug!("Response dropped, writer already stopped");
                }
            }
        });
    };

    let read_error = match stop {
        Stop::WriterStopped(joined) => {
            // Nothing can be delivered any more.
            tasks.shutdown().await;
            writer_result(joined)?;
            return Err(TransportError::connection("response writer stopped"));
        }
        Stop::ReadFailed(e) => Some(e),
        Stop::EndOfInput => None,
    };

    while let Some(joined) = tasks.join_next().await {
        log_task_result(joined);
    }
    drop(tx);
    let write_result = writer_result(writer_task.await);

    if let Some(e) = read_error {
        return Err(e);
    }
    write_result?;
    info!("Peer closed the connection");
    Ok(())
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        write_response(&mut writer, &response).await?;
    }
    Ok(())
}

fn writer_result(joined: Result<TransportResult<()>, JoinError>) -> TransportResult<()> {
    joined.unwrap_or_else(|e| Err(TransportError::connection(format!("response writer failed: {e}"))))
}

fn log_task_result(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!("Request task failed: {}", e);
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut bytes = serde_json::to_vec(response)?;
    debug!("-> {} bytes", bytes.len());
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
