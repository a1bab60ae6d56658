//! Server network layer: accepts TCP connections, upgrades them to
//! WebSockets and hands each one to a relay session.

use futures::{future, SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::WS_PATH;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

use crate::error::RelayError;
use crate::frame::Frame;
use crate::registry::Registry;
use crate::session::Session;

/// Owns the listening socket and the room registry for the process.
pub struct Server {
    listener: TcpListener,
    registry: Arc<Registry>,
}

impl Server {
    pub async fn bind(addr: &str) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            registry: Arc::new(Registry::new()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Accept loop. Each connection gets its own task; failures stay local
    /// to that connection.
    pub async fn run(self) {
        info!("Accepting WebSocket connections on {}", WS_PATH);

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(handle_connection(registry, stream, addr));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

/// Rejects every upgrade path other than [`WS_PATH`]. Origins are not checked.
fn check_path(request: &Request, response: Response) -> Result<Response, ErrorResponse> {
    if request.uri().path() == WS_PATH {
        return Ok(response);
    }

    let mut rejection = ErrorResponse::new(Some("Not Found".to_string()));
    *rejection.status_mut() = StatusCode::NOT_FOUND;
    Err(rejection)
}

async fn handle_connection(registry: Arc<Registry>, stream: TcpStream, addr: SocketAddr) {
    let ws = match tokio_tungstenite::accept_hdr_async(stream, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("Upgrade error from {}: {}", addr, e);
            return;
        }
    };

    let (sink, stream) = ws.split();

    let inbound = stream.filter_map(|message| {
        future::ready(match message {
            Ok(message) => Frame::from_message(message).transpose(),
            Err(e) => Some(Err(RelayError::from(e))),
        })
    });
    let outbound = sink
        .sink_map_err(RelayError::from)
        .with(|frame: Frame| future::ready(Ok::<_, RelayError>(Message::from(frame))));

    let session = Session::start(&registry, inbound, outbound).await;
    info!("{} connected from {}", session.player, addr);

    let player = session.player;
    match session.receiver.await {
        Ok(departure) => info!(
            "{} disconnected from {} (opponent notice: {:?})",
            player, session.room, departure.notice
        ),
        Err(e) => error!("Receiver task for {} failed: {}", player, e),
    }

    match session.sender.await {
        Ok(written) => debug!("{} sender wrote {} frames", player, written),
        Err(e) => error!("Sender task for {} failed: {}", player, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> Request {
        Request::builder()
            .uri(format!("ws://localhost{}", path))
            .body(())
            .unwrap()
    }

    #[test]
    fn test_check_path_accepts_ws_path() {
        let response = Response::builder().body(()).unwrap();
        assert!(check_path(&request(WS_PATH), response).is_ok());
    }

    #[test]
    fn test_check_path_rejects_other_paths() {
        let response = Response::builder().body(()).unwrap();
        let rejection = check_path(&request("/other"), response).unwrap_err();
        assert_eq!(rejection.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bind_reports_local_addr() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
        assert!(server.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_address() {
        assert!(Server::bind("not an address").await.is_err());
    }
}
