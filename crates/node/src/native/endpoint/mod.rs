//! Http service of a node: the `/dht` routes over [Swarm].
#![warn(missing_docs)]
mod http_error;

use std::sync::Arc;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::put;
use axum::Json;
use axum::Router;
use tower_http::cors::CorsLayer;

pub use self::http_error::HttpError;
use crate::error::Error;
use crate::prelude::chordring_rpc::method::Method;
use crate::prelude::chordring_rpc::types::IdQuery;
use crate::prelude::chordring_rpc::types::KeyQuery;
use crate::prelude::chordring_rpc::types::KeyValueQuery;
use crate::prelude::Did;
use crate::prelude::NodeInfo;
use crate::prelude::Swarm;
use crate::prelude::SwarmInspect;
use crate::prelude::TableRep;
use crate::prelude::TableRow;
use crate::processor::Processor;

/// Routes of a node, with CORS and the version header.
pub fn router(swarm: Arc<Swarm>) -> Router {
    Router::new()
        .route(&Method::NodeInfo.path(), get(info_handler))
        .route(&Method::Pred.path(), get(pred_handler))
        .route(&Method::Succ.path(), get(succ_handler))
        .route(&Method::Find.path(), get(find_handler))
        .route(
            &Method::FindClosestPrecedingFinger.path(),
            get(closest_preceding_finger_handler),
        )
        .route(&Method::Notify.path(), put(notify_handler))
        .route(&Method::GetValue.path(), get(get_value_handler))
        .route(&Method::Add.path(), put(add_handler))
        .route(&Method::Delete.path(), delete(delete_handler))
        .route(&Method::Inspect.path(), get(inspect_handler))
        .with_state(swarm)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(node_info_header))
}

/// Run the http service on `addr` until the processor shuts down.
pub async fn run_http_api(addr: &str, processor: Arc<Processor>) -> crate::error::Result<()> {
    let listener = std::net::TcpListener::bind(addr)
        .map_err(|e| Error::BindError(addr.to_string(), e.to_string()))?;
    println!("DHT endpoint: http://{}/dht", addr);
    serve(listener, processor).await
}

/// Run the http service on a bound listener until the processor shuts down.
pub async fn serve(listener: std::net::TcpListener, processor: Arc<Processor>) -> crate::error::Result<()> {
    listener
        .set_nonblocking(true)
        .map_err(|e| Error::BindError(format!("{:?}", listener.local_addr()), e.to_string()))?;
    let token = processor.cancellation_token();
    let app = router(processor.swarm.clone());
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await?;
    Ok(())
}

async fn node_info_header<B>(
    req: http::Request<B>,
    next: axum::middleware::Next<B>,
) -> axum::response::Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    if let Ok(version) = http::HeaderValue::from_str(crate::util::build_version().as_str()) {
        headers.insert("X-NODE-VERSION", version);
    }
    res
}

fn did_of(swarm: &Swarm, id: u64) -> Result<Did, HttpError> {
    let space = swarm.dht().space;
    if id >= space.size() {
        return Err(HttpError::BadRequest(format!(
            "id {} is outside of a {} bits ring",
            id,
            space.bits()
        )));
    }
    Ok(space.did(id))
}

async fn info_handler(State(swarm): State<Arc<Swarm>>) -> Json<NodeInfo> {
    tracing::debug!("GET /dht/info");
    Json(swarm.get_node_info())
}

async fn pred_handler(
    State(swarm): State<Arc<Swarm>>,
) -> Result<Json<Option<NodeInfo>>, HttpError> {
    tracing::debug!("GET /dht/pred");
    Ok(Json(swarm.get_pred()?))
}

async fn succ_handler(State(swarm): State<Arc<Swarm>>) -> Result<Json<NodeInfo>, HttpError> {
    tracing::debug!("GET /dht/succ");
    Ok(Json(swarm.get_succ()?))
}

async fn find_handler(
    State(swarm): State<Arc<Swarm>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<NodeInfo>, HttpError> {
    tracing::debug!("GET /dht/find?id={}", query.id);
    let did = did_of(&swarm, query.id)?;
    Ok(Json(swarm.find_successor(did).await?))
}

async fn closest_preceding_finger_handler(
    State(swarm): State<Arc<Swarm>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<NodeInfo>, HttpError> {
    tracing::debug!("GET /dht/findClosestPrecedingFinger?id={}", query.id);
    let did = did_of(&swarm, query.id)?;
    Ok(Json(swarm.closest_preceding_finger(did)?))
}

/// 200 with the transfer record when the candidate is accepted, 304 when
/// it is rejected.
async fn notify_handler(
    State(swarm): State<Arc<Swarm>>,
    Query(query): Query<IdQuery>,
    Json(record): Json<TableRep>,
) -> Result<Response, HttpError> {
    tracing::debug!("PUT /dht/notify?id={}", query.id);
    let candidate = record
        .info
        .as_ref()
        .ok_or_else(|| HttpError::BadRequest("notify without candidate".to_string()))?;
    if u64::from(candidate.id) != query.id {
        return Err(HttpError::BadRequest(format!(
            "candidate {} does not match id {}",
            candidate, query.id
        )));
    }
    match swarm.notify(record)? {
        Some(transfer) => Ok(Json(transfer).into_response()),
        None => Ok(StatusCode::NOT_MODIFIED.into_response()),
    }
}

async fn get_value_handler(
    State(swarm): State<Arc<Swarm>>,
    Query(query): Query<KeyQuery>,
) -> Json<TableRow> {
    tracing::debug!("GET /dht/getValue?key={}", query.key);
    let vals = swarm.get(&query.key);
    Json(TableRow::new(query.key, vals))
}

async fn add_handler(
    State(swarm): State<Arc<Swarm>>,
    Json(record): Json<TableRep>,
) -> Result<StatusCode, HttpError> {
    tracing::debug!("PUT /dht/add");
    swarm.add_record(&record)?;
    Ok(StatusCode::OK)
}

async fn delete_handler(
    State(swarm): State<Arc<Swarm>>,
    Query(query): Query<KeyValueQuery>,
) -> Result<StatusCode, HttpError> {
    tracing::debug!("DELETE /dht/delete?key={}&value={}", query.key, query.value);
    swarm.delete(&query.key, &query.value)?;
    Ok(StatusCode::OK)
}

async fn inspect_handler(
    State(swarm): State<Arc<Swarm>>,
) -> Result<Json<SwarmInspect>, HttpError> {
    tracing::debug!("GET /dht/inspect");
    Ok(Json(swarm.inspect()?))
}
