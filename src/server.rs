//! The mock NNTP server
//!
//! Lifecycle, in order:
//! 1. [`NntpServer::new`] with the listen address and options
//! 2. [`NntpServer::load_fixtures`] to seed the newsgroup database
//! 3. [`NntpServer::listen`] to bind the socket
//! 4. [`ListeningServer::serve`] (or [`ListeningServer::spawn`]) to accept clients

use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::auth::AuthHandler;
use crate::fixture::{self, FixtureDb, FixtureError};
use crate::protocol::DEFAULT_GREETING;
use crate::session::{ConnectionOptions, Session, handle_client};
use crate::store::Store;
use crate::types::{ClientId, ServerAddress};

/// Default idle timeout before a silent client is disconnected
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Behaviour switches for a server instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Refuse reader commands until AUTHINFO succeeds
    pub require_auth: bool,
    /// Text of the 201 greeting
    pub greeting: String,
    /// Zero disables the timeout
    pub idle_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            require_auth: false,
            greeting: DEFAULT_GREETING.to_string(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// A configured server that is not yet bound
#[derive(Debug)]
pub struct NntpServer {
    address: ServerAddress,
    options: ServerOptions,
    store: Arc<Store>,
    auth: Arc<AuthHandler>,
}

impl NntpServer {
    /// Create a server with an empty database
    pub fn new(address: ServerAddress, options: ServerOptions) -> Self {
        let auth = AuthHandler::default().with_required(options.require_auth);
        Self {
            address,
            options,
            store: Arc::new(Store::default()),
            auth: Arc::new(auth),
        }
    }

    #[inline]
    pub fn address(&self) -> &ServerAddress {
        &self.address
    }

    #[inline]
    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Replace the database and user table with the contents of a fixture file
    pub fn load_fixtures(&mut self, path: impl AsRef<Path>) -> Result<(), FixtureError> {
        let path = path.as_ref();
        info!("loading mock database");
        debug!("Reading fixtures from {}", path.display());
        let db = fixture::load_fixtures(path)?;
        self.install(&db)
    }

    /// Replace the database and user table with an in-memory fixture database
    pub fn load_fixture_db(&mut self, db: &FixtureDb) -> Result<(), FixtureError> {
        info!("loading mock database");
        self.install(db)
    }

    fn install(&mut self, db: &FixtureDb) -> Result<(), FixtureError> {
        let resolved = db.resolve()?;
        let auth = AuthHandler::new(self.options.require_auth, resolved.users);
        let store = Store::from_resolved(resolved.groups);
        info!(
            "Loaded {} groups with {} articles and {} users",
            store.group_count(),
            store.article_count(),
            auth.user_count()
        );
        self.store = Arc::new(store);
        self.auth = Arc::new(auth);
        Ok(())
    }

    /// Bind the listening socket
    ///
    /// Port 0 binds an ephemeral port; the chosen port is logged and
    /// available from [`ListeningServer::local_addr`].
    pub async fn listen(self) -> Result<ListeningServer> {
        info!("Starting server on {}", self.address);
        let bind_addr = self.address.socket_addr_string();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", bind_addr))?;
        let local_addr = listener.local_addr()?;
        info!("Serving on port :{}", local_addr.port());

        Ok(ListeningServer {
            listener,
            local_addr,
            store: self.store,
            auth: self.auth,
            connection: Arc::new(ConnectionOptions {
                greeting: self.options.greeting,
                idle_timeout: self.options.idle_timeout,
            }),
        })
    }
}

/// A bound server ready to accept clients
#[derive(Debug)]
pub struct ListeningServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    store: Arc<Store>,
    auth: Arc<AuthHandler>,
    connection: Arc<ConnectionOptions>,
}

impl ListeningServer {
    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept clients until `shutdown` completes
    ///
    /// Connected clients are told the server is going away and closed.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.spawn_client(stream, addr, shutdown_tx.subscribe()),
                    Err(e) => error!("Failed to accept connection: {}", e),
                },
            }
        }

        // No receivers just means no clients are connected
        let _ = shutdown_tx.send(());
        info!("Stopped server");
        Ok(())
    }

    fn spawn_client(&self, stream: TcpStream, addr: SocketAddr, shutdown: broadcast::Receiver<()>) {
        let client = ClientId::new();
        let session = Session::new(client, Arc::clone(&self.store), Arc::clone(&self.auth));
        let options = Arc::clone(&self.connection);

        tokio::spawn(async move {
            debug!("Client {} connected from {}", client, addr);
            if let Err(e) = stream.set_nodelay(true) {
                debug!("Client {}: failed to set TCP_NODELAY: {}", client, e);
            }
            let (read, write) = stream.into_split();
            match handle_client(BufReader::new(read), write, session, &options, shutdown).await {
                Ok(()) => debug!("Client {} session finished", client),
                Err(e) => error!("Error handling client {} ({}): {}", client, addr, e),
            }
        });
    }

    /// Serve in a background task
    pub fn spawn(self) -> ServerHandle {
        let local_addr = self.local_addr;
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.serve(async move {
            // A dropped handle also stops the server
            let _ = rx.await;
        }));
        ServerHandle {
            local_addr,
            shutdown: Some(tx),
            task,
        }
    }
}

/// Handle to a server running in the background
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, close clients and wait for the accept loop to end
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.context("server task panicked")?
    }
}
