//! Minimal HTTP/1.1 transport over raw sockets.
//!
//! ### Request
//! - One `GET` per connection, request line plus `Host` header only.
//! - No redirects, no chunked decoding, no connection reuse.
//!
//! ### Response framing
//! - `Content-Length` (or a body-less status) ends the read as soon as the
//!   declared bytes are in.
//! - Otherwise the peer closing the connection ends it.
//! - Otherwise an idle-read timeout is taken as the end of the response. This is
//!   a heuristic: a server that pauses longer than the timeout mid-body gets its
//!   response truncated.
//!
//! ### TLS
//! - `https` targets are upgraded with rustls using the platform trust store.

pub mod response;
pub mod target;
pub mod tls;

use std::io;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::rustls::pki_types::ServerName;

pub use response::{ContentKind, Headers, RawResponse};
pub use target::{Scheme, Target, TargetError};

use go2web_core::{AppConfig, Error};
use response::{Framing, framing};

/// Configuration for the transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bound on TCP connect and TLS handshake (default: 5s)
    pub connect_timeout: Duration,

    /// Idle time after which a read is considered finished (default: 2s)
    pub read_timeout: Duration,

    /// Maximum response size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Size of each socket read (default: 4KB)
    pub chunk_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(5_000),
            read_timeout: Duration::from_millis(2_000),
            max_bytes: 5 * 1024 * 1024,
            chunk_size: 4096,
        }
    }
}

impl From<&AppConfig> for TransportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            max_bytes: config.max_bytes,
            ..Default::default()
        }
    }
}

/// Something that can turn a [`Target`] into a raw response.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue one request and return the full response text.
    async fn fetch(&self, target: &Target) -> Result<RawResponse, Error>;
}

/// Build the exact bytes sent for a target.
pub fn build_request(target: &Target) -> String {
    format!("GET {} HTTP/1.1\r\nHost: {}\r\n\r\n", target.path(), target.host_header())
}

/// Socket transport: TCP, optionally wrapped in TLS.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    config: TransportConfig,
}

impl Transport {
    /// Create a new transport with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    async fn connect(&self, target: &Target) -> Result<TcpStream, Error> {
        let addr = (target.connect_host(), target.port());
        match timeout(self.config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(Error::Connection(format!(
                "failed to connect to {}:{}: {e}",
                target.host(),
                target.port()
            ))),
            Err(_) => Err(Error::Connection(format!(
                "connect to {}:{} timed out after {}ms",
                target.host(),
                target.port(),
                self.config.connect_timeout.as_millis()
            ))),
        }
    }

    async fn fetch_tls(&self, target: &Target, tcp: TcpStream, request: &[u8]) -> Result<BytesMut, Error> {
        let connector = tls::native_connector()?;
        let server_name = ServerName::try_from(target.connect_host().to_string())
            .map_err(|e| Error::Connection(format!("invalid TLS server name {}: {e}", target.host())))?;

        let mut stream = match timeout(self.config.connect_timeout, connector.connect(server_name, tcp)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(Error::Connection(format!("TLS handshake with {} failed: {e}", target.host()))),
            Err(_) => {
                return Err(Error::Connection(format!(
                    "TLS handshake with {} timed out after {}ms",
                    target.host(),
                    self.config.connect_timeout.as_millis()
                )));
            }
        };

        exchange(&mut stream, request, &self.config).await
    }
}

#[async_trait]
impl Fetcher for Transport {
    async fn fetch(&self, target: &Target) -> Result<RawResponse, Error> {
        let start = Instant::now();
        tracing::debug!(host = target.host(), port = target.port(), path = target.path(), "establishing connection");

        let request = build_request(target);
        let mut tcp = self.connect(target).await?;

        let bytes = if target.is_tls() {
            self.fetch_tls(target, tcp, request.as_bytes()).await?
        } else {
            exchange(&mut tcp, request.as_bytes(), &self.config).await?
        };

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            target,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(RawResponse::from_bytes(&bytes))
    }
}

/// Send the request and accumulate the response until it is framed, the peer
/// closes, or the idle timeout elapses.
///
/// The stream is borrowed; it is closed when the caller drops it, on every path.
async fn exchange<S>(stream: &mut S, request: &[u8], config: &TransportConfig) -> Result<BytesMut, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(request)
        .await
        .map_err(|e| Error::Connection(format!("failed to send request: {e}")))?;
    stream
        .flush()
        .await
        .map_err(|e| Error::Connection(format!("failed to send request: {e}")))?;

    let mut buf = BytesMut::with_capacity(config.chunk_size);
    let mut chunk = vec![0u8; config.chunk_size];
    let mut frame = Framing::Incomplete;

    loop {
        let read = match timeout(config.read_timeout, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => {
                tracing::debug!(bytes = buf.len(), "peer closed connection");
                break;
            }
            Ok(Ok(n)) => n,
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => {
                tracing::debug!(bytes = buf.len(), "peer closed without TLS close_notify");
                break;
            }
            Ok(Err(e)) => return Err(Error::Connection(format!("read failed: {e}"))),
            Err(_) if buf.is_empty() => {
                return Err(Error::Connection(format!(
                    "no data received within {}ms",
                    config.read_timeout.as_millis()
                )));
            }
            Err(_) => {
                tracing::warn!(
                    bytes = buf.len(),
                    "no data for {}ms; treating response as complete, it may be truncated",
                    config.read_timeout.as_millis()
                );
                break;
            }
        };

        buf.extend_from_slice(&chunk[..read]);

        if buf.len() > config.max_bytes {
            return Err(Error::TooLarge(format!("more than {} bytes received", config.max_bytes)));
        }

        if frame == Framing::Incomplete {
            // A separator may straddle the previous chunk boundary.
            let scan_from = (buf.len() - read).saturating_sub(3);
            frame = framing(&buf, scan_from);

            if let Framing::Length(total) = frame
                && total > config.max_bytes
            {
                return Err(Error::TooLarge(format!(
                    "declared response size exceeds {} bytes",
                    config.max_bytes
                )));
            }
        }
        if let Framing::Length(total) = frame
            && buf.len() >= total
        {
            tracing::debug!(bytes = total, "response complete per declared length");
            buf.truncate(total);
            break;
        }
    }

    if buf.is_empty() {
        return Err(Error::Connection("connection closed before any data was received".into()));
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn test_config(read_timeout_ms: u64) -> TransportConfig {
        TransportConfig {
            connect_timeout: Duration::from_millis(1_000),
            read_timeout: Duration::from_millis(read_timeout_ms),
            ..Default::default()
        }
    }

    /// Accept one connection, capture the request head, reply, then hold the
    /// socket open for `hold` before closing it.
    async fn serve_once(reply: &'static [u8], hold: Duration) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(reply).await.unwrap();
            tokio::time::sleep(hold).await;
            String::from_utf8(received).unwrap()
        });
        (addr, handle)
    }

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_millis(5_000));
        assert_eq!(config.read_timeout, Duration::from_millis(2_000));
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.chunk_size, 4096);
    }

    #[test]
    fn test_transport_config_from_app_config() {
        let app = AppConfig { read_timeout_ms: 750, max_bytes: 1024, ..Default::default() };
        let config = TransportConfig::from(&app);
        assert_eq!(config.read_timeout, Duration::from_millis(750));
        assert_eq!(config.max_bytes, 1024);
    }

    #[test]
    fn test_build_request() {
        let target = Target::parse("https://example.org").unwrap();
        assert_eq!(build_request(&target), "GET / HTTP/1.1\r\nHost: example.org\r\n\r\n");
    }

    #[tokio::test]
    async fn test_fetch_until_peer_close() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello world";
        let (addr, server) = serve_once(reply, Duration::ZERO).await;

        let target = Target::parse(&format!("http://{addr}/hello?x=1")).unwrap();
        let response = Transport::new(test_config(2_000)).fetch(&target).await.unwrap();

        assert_eq!(response.text(), String::from_utf8_lossy(reply));
        assert_eq!(response.body(), "hello world");

        let request = server.await.unwrap();
        assert_eq!(request, format!("GET /hello?x=1 HTTP/1.1\r\nHost: {addr}\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_fetch_content_length_does_not_wait_for_close() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
        let (addr, _server) = serve_once(reply, Duration::from_secs(30)).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let transport = Transport::new(test_config(10_000));
        let response = timeout(Duration::from_secs(3), transport.fetch(&target))
            .await
            .expect("fetch should finish on Content-Length")
            .unwrap();

        assert_eq!(response.body(), "hello");
    }

    #[tokio::test]
    async fn test_fetch_idle_timeout_completes_partial_response() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<p>partial";
        let (addr, _server) = serve_once(reply, Duration::from_secs(30)).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let response = Transport::new(test_config(200)).fetch(&target).await.unwrap();

        assert_eq!(response.body(), "<p>partial");
    }

    #[tokio::test]
    async fn test_fetch_stall_without_data_is_connection_error() {
        let (addr, _server) = serve_once(b"", Duration::from_secs(30)).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let start = Instant::now();
        let result = Transport::new(test_config(300)).fetch(&target).await;

        assert!(matches!(result, Err(Error::Connection(msg)) if msg.contains("no data")));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_tls_stall_is_connection_error() {
        let (addr, _server) = serve_once(b"", Duration::from_secs(30)).await;

        let target = Target::parse(&format!("https://{addr}/")).unwrap();
        let config = TransportConfig { connect_timeout: Duration::from_millis(500), ..test_config(300) };
        let start = Instant::now();
        let result = Transport::new(config).fetch(&target).await;

        assert!(matches!(result, Err(Error::Connection(_))));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_huge_content_length_is_too_large() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\nhello";
        let (addr, _server) = serve_once(reply, Duration::from_secs(30)).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let transport = Transport::new(test_config(10_000));
        let result = timeout(Duration::from_secs(3), transport.fetch(&target))
            .await
            .expect("declared length should be rejected without waiting");

        assert!(matches!(result, Err(Error::TooLarge(_))));
    }

    #[tokio::test]
    async fn test_fetch_head_split_across_reads() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";
        let (addr, _server) = serve_once(reply, Duration::from_secs(30)).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let config = TransportConfig { chunk_size: 3, ..test_config(10_000) };
        let transport = Transport::new(config);
        let response = timeout(Duration::from_secs(3), transport.fetch(&target))
            .await
            .expect("fetch should finish on Content-Length")
            .unwrap();

        assert_eq!(response.body(), "ok");
    }

    #[tokio::test]
    async fn test_fetch_close_without_data_is_connection_error() {
        let (addr, _server) = serve_once(b"", Duration::ZERO).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let result = Transport::new(test_config(2_000)).fetch(&target).await;

        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let reply = b"HTTP/1.1 200 OK\r\n\r\nthis body is far longer than the limit allows";
        let (addr, _server) = serve_once(reply, Duration::ZERO).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let config = TransportConfig { max_bytes: 16, ..test_config(2_000) };
        let result = Transport::new(config).fetch(&target).await;

        assert!(matches!(result, Err(Error::TooLarge(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let result = Transport::new(test_config(2_000)).fetch(&target).await;

        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_utf8_is_replaced() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\n\xffok!";
        let (addr, _server) = serve_once(reply, Duration::ZERO).await;

        let target = Target::parse(&format!("http://{addr}/")).unwrap();
        let response = Transport::new(test_config(2_000)).fetch(&target).await.unwrap();

        assert_eq!(response.body(), "\u{FFFD}ok!");
    }
}
