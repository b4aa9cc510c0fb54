//! TCP Server
//!
//! Accepts connections and dispatches them to a fixed pool of workers.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, SendTimeoutError};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{PacketError, Result};
use crate::store::TextStore;

use super::Connection;

/// How long the acceptor waits on an idle listener or a full worker queue
/// before checking the shutdown flag again
const ACCEPT_POLL: Duration = Duration::from_millis(20);

/// TCP server for the text service
pub struct Server {
    config: Config,
    store: Arc<TextStore>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Streams accepted and not yet finished, so shutdown can unblock their reads
#[derive(Default)]
struct Sessions {
    next_id: u64,
    open: HashMap<u64, TcpStream>,
}

impl Sessions {
    fn register(&mut self, stream: &TcpStream) -> Result<u64> {
        let id = self.next_id;
        self.next_id += 1;
        self.open.insert(id, stream.try_clone()?);
        Ok(id)
    }

    fn close_all(&mut self) {
        for (_, stream) in self.open.drain() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl Server {
    /// Bind the listen address; call [`run`](Self::run) to start serving
    pub fn bind(config: Config, store: Arc<TextStore>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            PacketError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            store,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until [`shutdown`](Self::shutdown) is called (blocking)
    pub fn run(&self) -> Result<()> {
        let workers = self.config.worker_threads;
        let (tx, rx) = channel::bounded::<(u64, TcpStream)>(workers);
        let sessions = Arc::new(Mutex::new(Sessions::default()));

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let rx = rx.clone();
                let store = Arc::clone(&self.store);
                let sessions = Arc::clone(&sessions);
                let config = self.config.clone();
                thread::Builder::new()
                    .name(format!("typepack-worker-{}", id))
                    .spawn(move || worker_loop(rx, store, sessions, config))
            })
            .collect::<std::io::Result<_>>()?;
        drop(rx);

        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            workers
        );

        'accept: while !self.is_shutting_down() {
            let (stream, addr) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };

            tracing::trace!("Accepted connection from {}", addr);
            let registered = stream
                .set_nonblocking(false)
                .map_err(PacketError::from)
                .and_then(|()| sessions.lock().register(&stream));
            let mut job = match registered {
                Ok(id) => (id, stream),
                Err(e) => {
                    tracing::warn!("Rejecting connection from {}: {}", addr, e);
                    continue;
                }
            };

            loop {
                match tx.send_timeout(job, ACCEPT_POLL) {
                    Ok(()) => break,
                    Err(SendTimeoutError::Timeout(pending)) => {
                        if self.is_shutting_down() {
                            tracing::debug!("Dropping queued connection from {}", addr);
                            break 'accept;
                        }
                        job = pending;
                    }
                    Err(SendTimeoutError::Disconnected(_)) => {
                        tracing::error!("All workers have exited, stopping acceptor");
                        break 'accept;
                    }
                }
            }
        }

        drop(tx);
        sessions.lock().close_all();
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    ///
    /// The acceptor stops within one poll interval and open sessions are
    /// closed, so `run` returns without waiting on idle clients.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

fn worker_loop(
    rx: Receiver<(u64, TcpStream)>,
    store: Arc<TextStore>,
    sessions: Arc<Mutex<Sessions>>,
    config: Config,
) {
    for (id, stream) in rx.iter() {
        let result = Connection::new(stream, Arc::clone(&store)).and_then(|mut conn| {
            conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
            conn.handle()
        });
        sessions.lock().open.remove(&id);
        if let Err(e) = result {
            tracing::debug!("Session ended with error: {}", e);
        }
    }
}
