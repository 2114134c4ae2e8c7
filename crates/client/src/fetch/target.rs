//! URL decomposition into connection parameters.

use std::fmt;

use go2web_core::Error;

/// Error type for URL decomposition failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<TargetError> for Error {
    fn from(err: TargetError) -> Self {
        Error::Configuration(err.to_string())
    }
}

/// Transport scheme of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Port used when the URL does not name one.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Connection parameters for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Target {
    /// Decompose a URL into host, port and path.
    ///
    /// Rules:
    /// 1. Only `http` and `https` are accepted; anything else is a configuration error
    /// 2. Port comes from the URL if present, else 80/443 by scheme
    /// 3. The path keeps its query string and is never empty (`/` at minimum)
    /// 4. Fragments are dropped; they are never sent on the wire
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }

        let parsed = url::Url::parse(trimmed).map_err(|e| TargetError::InvalidUrl(format!("{trimmed}: {e}")))?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        };

        let host = match parsed.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(TargetError::MissingHost(trimmed.to_string())),
        };

        let port = parsed.port().unwrap_or_else(|| scheme.default_port());

        let mut path = parsed.path().to_string();
        if path.is_empty() {
            path.push('/');
        }
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self { scheme, host, port, path })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host as written in the URL (IPv6 literals keep their brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target for the request line: path plus query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the connection must be upgraded to TLS.
    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::Https
    }

    /// Host in the form expected by the resolver and the TLS server name.
    pub fn connect_host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }

    /// Value of the `Host` header.
    ///
    /// The port is only appended when it differs from the scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

impl std::str::FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s).map_err(Error::from)
    }
}
