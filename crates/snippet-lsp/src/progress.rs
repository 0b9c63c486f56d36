//! LSP Work Done Progress backing for the loading indicator.
//!
//! # Protocol Flow
//!
//! 1. `window/workDoneProgress/create` - Request token creation
//! 2. `$/progress` with `WorkDoneProgressBegin` - "Loading Snippet ..."
//! 3. `$/progress` with `WorkDoneProgressEnd` - Resolution finished
//!
//! [`LoadingIndicator`] is synchronous and is called from guard drops, so
//! show and hide only enqueue a signal. A single worker task drains the queue
//! and talks to the client, which keeps begin/end pairs in order.

use snippet_core::LoadingIndicator;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::notification::Progress;
use tower_lsp_server::ls_types::request::WorkDoneProgressCreate;
use tower_lsp_server::ls_types::{
    ProgressParams, ProgressParamsValue, ProgressToken, WorkDoneProgress, WorkDoneProgressBegin,
    WorkDoneProgressCreateParams, WorkDoneProgressEnd,
};

pub const LOADING_TITLE: &str = "Loading Snippet ...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Show,
    Hide,
}

/// Loading indicator shown as a client progress notification.
pub struct LoadingProgress {
    client: Client,
    sender: OnceLock<mpsc::UnboundedSender<Signal>>,
}

impl LoadingProgress {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            sender: OnceLock::new(),
        }
    }

    fn send(&self, signal: Signal) {
        // The worker is spawned on first use so the indicator can be built
        // outside a runtime.
        let sender = self.sender.get_or_init(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(run_worker(self.client.clone(), rx));
            tx
        });
        if sender.send(signal).is_err() {
            tracing::debug!("progress worker stopped, dropping {:?}", signal);
        }
    }
}

impl LoadingIndicator for LoadingProgress {
    fn show(&self) {
        self.send(Signal::Show);
    }

    fn hide(&self) {
        self.send(Signal::Hide);
    }
}

async fn run_worker(client: Client, mut rx: mpsc::UnboundedReceiver<Signal>) {
    static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);
    let mut active: Option<ProgressToken> = None;

    while let Some(signal) = rx.recv().await {
        match (signal, active.take()) {
            (Signal::Show, None) => {
                let token = progress_token(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed));
                if let Err(e) = client
                    .send_request::<WorkDoneProgressCreate>(WorkDoneProgressCreateParams {
                        token: token.clone(),
                    })
                    .await
                {
                    tracing::debug!("client rejected progress token: {:?}", e);
                    continue;
                }
                client
                    .send_notification::<Progress>(begin_params(token.clone()))
                    .await;
                active = Some(token);
            }
            (Signal::Hide, Some(token)) => {
                client.send_notification::<Progress>(end_params(token)).await;
            }
            (Signal::Show, Some(token)) => active = Some(token),
            (Signal::Hide, None) => {}
        }
    }

    if let Some(token) = active {
        client.send_notification::<Progress>(end_params(token)).await;
    }
}

fn progress_token(id: u64) -> ProgressToken {
    ProgressToken::String(format!("snippet-loading-{id}"))
}

fn begin_params(token: ProgressToken) -> ProgressParams {
    ProgressParams {
        token,
        value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(WorkDoneProgressBegin {
            title: LOADING_TITLE.to_string(),
            message: None,
            cancellable: Some(false),
            percentage: None,
        })),
    }
}

fn end_params(token: ProgressToken) -> ProgressParams {
    ProgressParams {
        token,
        value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
            message: None,
        })),
    }
}
