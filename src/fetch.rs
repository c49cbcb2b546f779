//! Background fetching.
//!
//! Runs a tokio runtime on a dedicated thread.  The UI thread sends
//! [`FetchRequest`]s over an unbounded channel; every request is spawned as
//! its own task, so requests overlap and complete in whatever order the
//! network decides.  Results travel back to the UI thread over an [`mpsc`]
//! channel as [`FetchMsg`]s, tagged with the token of the request that
//! produced them.
//!
//! Nothing here decides whether a response is still wanted; that is the
//! view-model's job (see [`crate::app::App::apply`]).

use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::river::{Feed, FetchError, RiverContent, RiverSource};

/// Identifies one request.  Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// Work for the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Manifest { token: RequestToken },
    River { token: RequestToken, url: String },
}

/// Messages sent from the fetcher back to the UI thread.
#[derive(Debug)]
pub enum FetchMsg {
    Manifest {
        token: RequestToken,
        result: Result<Vec<Feed>, FetchError>,
    },
    River {
        token: RequestToken,
        url: String,
        result: Result<RiverContent, FetchError>,
    },
}

/// Spawn the fetcher thread.
///
/// Returns the request sender and the receiver the main loop drains on every
/// tick.  The thread exits once the sender is dropped and in-flight requests
/// have finished.
pub fn spawn(
    source: Arc<dyn RiverSource>,
) -> Result<(UnboundedSender<FetchRequest>, mpsc::Receiver<FetchMsg>)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("river-fetch")
        .build()
        .context("failed to start fetch runtime")?;

    let (request_tx, request_rx) = unbounded_channel();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::Builder::new()
        .name("river-fetcher".into())
        .spawn(move || runtime.block_on(run(source, request_rx, msg_tx)))
        .context("failed to spawn fetcher thread")?;

    Ok((request_tx, msg_rx))
}

async fn run(
    source: Arc<dyn RiverSource>,
    mut requests: UnboundedReceiver<FetchRequest>,
    results: mpsc::Sender<FetchMsg>,
) {
    let mut tasks = tokio::task::JoinSet::new();

    while let Some(request) = requests.recv().await {
        tracing::debug!(?request, "dispatching");
        let source = Arc::clone(&source);
        let results = results.clone();
        tasks.spawn(async move {
            let msg = execute(source.as_ref(), request).await;
            // Receiver gone means the UI has exited.
            let _ = results.send(msg);
        });
        // Reap finished tasks so the set does not grow without bound.
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    tracing::debug!("fetcher stopped");
}

/// Perform one request against `source`.
pub async fn execute(source: &dyn RiverSource, request: FetchRequest) -> FetchMsg {
    match request {
        FetchRequest::Manifest { token } => FetchMsg::Manifest {
            token,
            result: source.fetch_manifest().await,
        },
        FetchRequest::River { token, url } => {
            let result = source.fetch_river(&url).await;
            FetchMsg::River { token, url, result }
        }
    }
}
