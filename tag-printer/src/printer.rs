//! Printer adapters for sending ZPL data
//!
//! Zebra and compatible label printers accept raw ZPL on TCP port 9100.

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send a raw command stream to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (raw TCP, usually port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
    probe_timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_millis(500),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the reachability probe timeout used by [`Printer::is_online`]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn connect(&self, limit: Duration) -> PrintResult<TcpStream> {
        match tokio::time::timeout(limit, TcpStream::connect(self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(PrintError::Connection(format!("{}: {}", self.addr, e))),
            Err(_) => Err(PrintError::Timeout(format!(
                "no answer from {} within {} ms",
                self.addr,
                limit.as_millis()
            ))),
        }
    }
}

impl Printer for NetworkPrinter {
    /// One connection per job; closing the write half ends the job
    #[instrument(skip(self, data), fields(addr = %self.addr, bytes = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = self.connect(self.timeout).await?;
        debug!("Connected, streaming label");

        stream.write_all(data).await?;
        stream.flush().await?;
        stream.shutdown().await?;

        debug!("Label delivered");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        match self.connect(self.probe_timeout).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Printer not reachable");
                false
            }
        }
    }
}
