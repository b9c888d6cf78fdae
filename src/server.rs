//! Metrics Endpoint Server
//!
//! Serves the owned registry's current state in Prometheus text exposition
//! format. Binding is split from serving so a bind failure surfaces before
//! the agent's tick loop is allowed to start.

use crate::error::Result;
use crate::metrics::DiskUsageMetrics;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::{Encoder, TextEncoder};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the scrape listener. Failure here is fatal at startup.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("metrics endpoint listening on {}", addr);
    Ok(listener)
}

/// Accept loop: serve the registry at `path`, 404 everywhere else.
///
/// Runs until the process exits; request handling is independent of the
/// agent's tick loop and only shares the registry handle.
pub async fn serve(
    listener: TcpListener,
    path: String,
    metrics: Arc<DiskUsageMetrics>,
) -> Result<()> {
    let path = Arc::new(path);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let path = Arc::clone(&path);
        let metrics = Arc::clone(&metrics);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let path = Arc::clone(&path);
                let metrics = Arc::clone(&metrics);
                async move { Ok::<_, Infallible>(handle(&req, &path, &metrics)) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!("metrics endpoint connection error: {}", e);
            }
        });
    }
}

fn handle(
    req: &Request<hyper::body::Incoming>,
    path: &str,
    metrics: &DiskUsageMetrics,
) -> Response<Full<Bytes>> {
    if req.uri().path() != path {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap();
    }

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&metrics.registry().gather(), &mut buffer) {
        Ok(()) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", encoder.format_type())
            .body(Full::new(Bytes::from(buffer)))
            .unwrap(),
        Err(e) => Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Full::new(Bytes::from(format!("encoding error: {}", e))))
            .unwrap(),
    }
}

// =============================================================================
// Tests
// =============================================================================
