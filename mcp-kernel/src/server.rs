//! HTTP server lifecycle.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::Server;
use hyper::service::{make_service_fn, service_fn};
use mcp_tools::ToolRegistry;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::service::ToolService;

/// HTTP server exposing a frozen [`ToolRegistry`].
#[derive(Debug)]
pub struct ToolServer {
    service: ToolService,
    addr: SocketAddr,
}

impl ToolServer {
    /// Creates a server that will listen on `addr`.
    #[must_use]
    pub fn new(registry: ToolRegistry, addr: SocketAddr) -> Self {
        Self {
            service: ToolService::new(Arc::new(registry)),
            addr,
        }
    }

    /// Overrides the largest accepted invocation body.
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.service = self.service.with_max_body_bytes(limit);
        self
    }

    /// Returns the configured listen address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// connections.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound and
    /// [`ServerError::Serve`] if the server fails while running.
    pub async fn serve<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (_, server) = self.bind(shutdown)?;
        server.await?;
        info!("tool server stopped");
        Ok(())
    }

    /// Binds immediately and serves on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub fn spawn(self) -> ServerResult<RunningServer> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (addr, server) = self.bind(async {
            let _ = shutdown_rx.await;
        })?;

        Ok(RunningServer {
            addr,
            shutdown: Some(shutdown_tx),
            handle: tokio::spawn(server),
        })
    }

    fn bind<F>(
        self,
        shutdown: F,
    ) -> ServerResult<(SocketAddr, impl Future<Output = Result<(), hyper::Error>>)>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr;
        let builder = Server::try_bind(&addr).map_err(|source| ServerError::Bind { addr, source })?;
        let service = self.service;
        let make_service = make_service_fn(move |_conn| {
            let service = service.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |request| {
                    let service = service.clone();
                    async move { Ok::<_, Infallible>(service.handle(request).await) }
                }))
            }
        });

        let server = builder.serve(make_service);
        let local_addr = server.local_addr();
        info!(addr = %local_addr, "tool server listening");
        Ok((local_addr, server.with_graceful_shutdown(shutdown)))
    }
}

/// Handle to a server started with [`ToolServer::spawn`].
#[derive(Debug)]
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), hyper::Error>>,
}

impl RunningServer {
    /// Returns the address the server is bound to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signals shutdown and waits for the server task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the server failed and
    /// [`ServerError::Task`] if its task panicked.
    pub async fn shutdown(mut self) -> ServerResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await??;
        info!(addr = %self.addr, "tool server stopped");
        Ok(())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            warn!(addr = %self.addr, "running server dropped without shutdown");
            let _ = tx.send(());
        }
    }
}
