//! Network infrastructure — implements `NetworkProbe` using `spawn_blocking`.

use std::net::ToSocketAddrs;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::NetworkProbe;

/// Connect timeout per resolved address.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Production implementation that performs real TCP connects.
pub struct TokioNetworkProbe;

impl NetworkProbe for TokioNetworkProbe {
    async fn check_tcp_connectivity(&self, host: &str, port: u16) -> Result<bool> {
        let target = format!("{host}:{port}");
        let result = tokio::task::spawn_blocking(move || {
            let addrs = target
                .to_socket_addrs()
                .map_err(|e| anyhow::anyhow!("cannot resolve {target}: {e}"))?;
            Ok::<bool, anyhow::Error>(
                addrs
                    .into_iter()
                    .any(|addr| std::net::TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok()),
            )
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))??;
        Ok(result)
    }
}
