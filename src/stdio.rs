use crate::tools::{Response, Tools};
use simple_error::{SimpleError, SimpleResult};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Serves request lines until `input` closes. Every call runs on its own
/// task; responses are written one per line in completion order.
pub async fn run<R, W>(tools: Arc<Tools>, input: R, output: W) -> SimpleResult<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_responses(rx, output));
    let mut lines = input.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| SimpleError::with("read request", e))?
    {
        if line.trim().is_empty() {
            continue;
        }
        let (tools, tx) = (tools.clone(), tx.clone());
        tokio::spawn(async move {
            if tx.send(serve(tools, line).await).is_err() {
                log::warn!("response dropped, writer is gone");
            }
        });
    }
    log::info!("input closed, waiting for pending calls");
    drop(tx);
    writer
        .await
        .map_err(|e| SimpleError::with("writer task", e))?
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<Response>,
    mut out: W,
) -> SimpleResult<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response)
            .map_err(|e| SimpleError::with("encode response", e))?;
        line.push('\n');
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| SimpleError::with("write response", e))?;
        out.flush()
            .await
            .map_err(|e| SimpleError::with("write response", e))?;
    }
    Ok(out)
}

// the core blocks on network I/O
async fn serve(tools: Arc<Tools>, line: String) -> Response {
    match tokio::task::spawn_blocking(move || tools.handle_line(&line)).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("tool call panicked: {}", e);
            Response {
                id: serde_json::Value::Null,
                is_error: true,
                content: format!("internal error: {}", e),
            }
        }
    }
}
