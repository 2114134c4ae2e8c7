//! Artifact CRUD operations.
//!
//! Every operation takes the requested URL and fingerprints it; callers never
//! handle keys directly.

use super::connection::CacheDb;
use super::hash::fingerprint;
use crate::{Artifact, Error};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Whether an artifact is stored for this URL.
    pub async fn contains(&self, url: &str) -> Result<bool, Error> {
        let key = fingerprint(url);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn
                    .query_row("SELECT EXISTS(SELECT 1 FROM artifacts WHERE key = ?1)", params![key], |row| {
                        row.get(0)
                    })
                    .map_err(Error::from)?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Get the artifact stored for this URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if nothing is stored; check [`CacheDb::contains`]
    /// first when a miss is expected.
    pub async fn get(&self, url: &str) -> Result<Artifact, Error> {
        let key = fingerprint(url);
        let owned_url = url.to_string();
        let body = self
            .conn
            .call(move |conn| -> Result<String, Error> {
                let mut stmt = conn.prepare("SELECT body FROM artifacts WHERE key = ?1")?;

                match stmt.query_row(params![key], |row| row.get(0)) {
                    Ok(body) => Ok(body),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::NotFound(owned_url)),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        serde_json::from_str(&body).map_err(|e| Error::Parse(format!("corrupt cache entry for {url}: {e}")))
    }

    /// Insert or overwrite the artifact for this URL.
    ///
    /// The write is committed before this returns.
    pub async fn put(&self, url: &str, artifact: &Artifact) -> Result<(), Error> {
        let key = fingerprint(url);
        let url = url.to_string();
        let kind = artifact.kind();
        let body = serde_json::to_string(artifact).map_err(|e| Error::Parse(format!("failed to encode artifact: {e}")))?;
        let stored_at = chrono::Utc::now().to_rfc3339();

        tracing::debug!(%url, %key, kind, bytes = body.len(), "caching artifact");

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO artifacts (key, url, kind, body, stored_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key) DO UPDATE SET
                        url = excluded.url,
                        kind = excluded.kind,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![key, url, kind, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Evict the artifact for this URL.
    ///
    /// Returns whether an entry was removed.
    pub async fn remove(&self, url: &str) -> Result<bool, Error> {
        let key = fingerprint(url);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM artifacts WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Evict every artifact.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM artifacts", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored artifacts.
    pub async fn len(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM artifacts", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Whether the cache holds no artifacts.
    pub async fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len().await? == 0)
    }
}
