//! MCP stdio server implementing JSON-RPC 2.0 over stdin/stdout.
//!
//! Protocol: newline-delimited JSON-RPC 2.0 on stdin/stdout.
//! Logging goes to stderr (stdout is reserved for protocol messages).
//!
//! Requests run concurrently because `human_interaction` blocks until the
//! operator answers; responses are funnelled through a single writer task.
//! `notifications/cancelled` cancels the matching in-flight call.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::protocol::{parse_request, McpHandler};

type InFlight = Arc<StdMutex<HashMap<String, CancellationToken>>>;

/// MCP stdio server exposing `human_interaction`.
pub struct StdioServer {
    handler: McpHandler,
    shutdown: CancellationToken,
}

impl StdioServer {
    pub fn new(handler: McpHandler, shutdown: CancellationToken) -> Self {
        Self { handler, shutdown }
    }

    /// Run the stdio server loop, reading JSON-RPC from stdin and writing responses to stdout.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve one client over an arbitrary byte stream pair.
    pub async fn serve<R, W>(&self, input: R, output: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(64);
        let writer = tokio::spawn(write_lines(output, rx));
        let in_flight: InFlight = Arc::new(StdMutex::new(HashMap::new()));
        let mut calls = JoinSet::new();
        let mut lines = BufReader::new(input).lines();

        info!("mcp stdio server started");

        loop {
            let line = tokio::select! {
                () = self.shutdown.cancelled() => break,
                line = lines.next_line() => match line? {
                    Some(line) => line,
                    None => break,
                },
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let request = match parse_request(line) {
                Ok(request) => request,
                Err(response) => {
                    if tx.send(response.to_line()).await.is_err() {
                        break;
                    }
                    continue;
                }
            };

            if request.method == "notifications/cancelled" {
                cancel_call(&in_flight, &request.params());
                continue;
            }

            let token = self.shutdown.child_token();
            let key = request.id.as_ref().map(Value::to_string);
            if let Some(key) = &key {
                lock(&in_flight).insert(key.clone(), token.clone());
            }

            let handler = self.handler.clone();
            let tx = tx.clone();
            let in_flight = Arc::clone(&in_flight);
            calls.spawn(async move {
                if let Some(response) = handler.handle(request, &token).await {
                    if tx.send(response.to_line()).await.is_err() {
                        warn!("stdout writer closed, response dropped");
                    }
                }
                if let Some(key) = key {
                    lock(&in_flight).remove(&key);
                }
            });
        }

        // Input is gone: release blocked calls so they can answer and exit.
        for token in lock(&in_flight).values() {
            token.cancel();
        }
        while calls.join_next().await.is_some() {}
        drop(tx);

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed writing to stdout"),
            Err(e) => warn!(error = %e, "stdout writer task failed"),
        }
        info!("mcp stdio server stopped");
        Ok(())
    }
}

fn lock(in_flight: &InFlight) -> std::sync::MutexGuard<'_, HashMap<String, CancellationToken>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cancel_call(in_flight: &InFlight, params: &Value) {
    let Some(request_id) = params.get("requestId") else {
        return;
    };
    match lock(in_flight).get(&request_id.to_string()) {
        Some(token) => {
            debug!(request_id = %request_id, "cancelling in-flight call");
            token.cancel();
        }
        None => debug!(request_id = %request_id, "cancel for unknown call ignored"),
    }
}

async fn write_lines<W>(mut output: W, mut rx: mpsc::Receiver<String>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        let mut bytes = line.into_bytes();
        bytes.push(b'\n');
        output.write_all(&bytes).await?;
        output.flush().await?;
    }
    Ok(())
}
