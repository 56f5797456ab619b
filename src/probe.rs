use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

/// Reachability probe reduced to a yes/no answer. Connection refused, DNS
/// failure and timeout all resolve to `false`, never an error.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str, port: u16, timeout: Duration) -> bool {
        let addr = format!("{}:{}", host, port);
        match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(_)) => false,
            Err(_) => false,
        }
    }
}
