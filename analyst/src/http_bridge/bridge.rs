use crate::http_bridge::model::{ActionReply, CatalogQuery, ErrorReply, SelectBody};
use crate::workflow::runner::Runner;
use anyhow::Context;
use chaoscore::prelude::RequestError;
use log::{info, warn};
use std::net::SocketAddr;
use tokio::signal;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

/// HTTP surface over a shared `Runner`.
///
/// `/select` and `/compare` wait for the model before replying; overlapping
/// calls resolve through the orchestrator so only the newest one is applied.
pub fn routes(runner: Runner) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let runner_filter = warp::any().map(move || runner.clone());

    let state_route = warp::path("state")
        .and(warp::path::end())
        .and(warp::get())
        .and(runner_filter.clone())
        .map(|runner: Runner| warp::reply::json(&runner.snapshot()));

    let catalog_route = warp::path("catalog")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CatalogQuery>())
        .and(runner_filter.clone())
        .map(|query: CatalogQuery, runner: Runner| warp::reply::json(&runner.search(&query.q)));

    let select_route = warp::path("select")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(runner_filter.clone())
        .and_then(|body: SelectBody, runner: Runner| async move {
            let result = runner.select(&body.circuit_id).await;
            Ok::<_, Rejection>(action_reply(result, &runner))
        });

    let compare_route = warp::path("compare")
        .and(warp::path::end())
        .and(warp::post())
        .and(runner_filter)
        .and_then(|runner: Runner| async move {
            let result = runner.compare().await;
            Ok::<_, Rejection>(action_reply(result, &runner))
        });

    state_route
        .or(catalog_route)
        .or(select_route)
        .or(compare_route)
}

fn action_reply(result: Result<bool, RequestError>, runner: &Runner) -> WithStatus<Json> {
    match result {
        Ok(applied) => warp::reply::with_status(
            warp::reply::json(&ActionReply {
                applied,
                state: runner.snapshot(),
            }),
            StatusCode::OK,
        ),
        Err(err) => {
            warn!("bridge request rejected: {err}");
            warp::reply::with_status(
                warp::reply::json(&ErrorReply {
                    error: err.to_string(),
                }),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}

/// Serves the bridge until Ctrl+C.
pub async fn serve(runner: Runner, addr: SocketAddr) -> anyhow::Result<()> {
    let (bound, server) = warp::serve(routes(runner))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(err) = signal::ctrl_c().await {
                warn!("awaiting Ctrl+C failed: {err}");
            }
        })
        .with_context(|| format!("binding HTTP bridge to {addr}"))?;
    info!("HTTP bridge listening on {bound} (Ctrl+C to stop)");
    server.await;
    info!("HTTP bridge stopped");
    Ok(())
}
