use crate::stub::figure::build_figure;
use anyhow::Context;
use bzcore::model::PlotRequest;
use serde_json::json;
use std::{convert::Infallible, net::SocketAddr, sync::mpsc, thread};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter, Rejection, Reply};

pub fn stub_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Routes of the offline stand-in for the plot service.
pub fn routes() -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})));

    let generate = warp::path("generate_plot")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .map(|request: PlotRequest| match build_figure(&request) {
            Ok(figure) => {
                log::info!(
                    "[stub] figure for {} k-points / {} path labels",
                    request.kpoints.len(),
                    request.path.len()
                );
                warp::reply::with_status(warp::reply::json(&figure), StatusCode::OK)
            }
            Err(err) => {
                log::warn!("[stub] rejecting request: {err}");
                warp::reply::with_status(
                    warp::reply::json(&json!({"detail": err.to_string()})),
                    StatusCode::UNPROCESSABLE_ENTITY,
                )
            }
        });

    health.or(generate).recover(handle_rejection)
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(body) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:?}"))
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({"detail": detail})),
        status,
    ))
}

/// Stub backend running on its own thread and runtime.
pub struct StubServer {
    addr: SocketAddr,
}

impl StubServer {
    /// Returns once the listener is bound, so callers may connect immediately.
    pub fn spawn(addr: SocketAddr) -> anyhow::Result<Self> {
        let (ready_tx, ready_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(anyhow::anyhow!("building stub runtime: {err}")));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes()).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        let _ = ready_tx.send(Ok(bound));
                        server.await;
                    }
                    Err(err) => {
                        let _ = ready_tx
                            .send(Err(anyhow::anyhow!("binding stub to {addr}: {err}")));
                    }
                }
            });
        });
        let addr = ready_rx
            .recv()
            .context("stub server thread exited before binding")??;
        log::info!("[stub] listening on http://{addr}");
        Ok(Self { addr })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
