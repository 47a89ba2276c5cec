//! Redis session backend with native per-key expiry.
//!
//! Suitable for multi-node deployments.

#[cfg(feature = "redis-session")]
mod implementation {
    use std::time::Duration;

    use async_trait::async_trait;
    use redis::AsyncCommands;
    use tracing::error;

    use bookstore_cache::RedisClient;
    use bookstore_cache::keys;
    use bookstore_core::error::{AppError, ErrorKind};
    use bookstore_core::result::AppResult;

    use crate::session::backend::SessionBackend;

    /// Session records stored as `SET <prefix>session:<sid> <principal> EX <ttl>`.
    #[derive(Debug, Clone)]
    pub struct RedisSessionBackend {
        /// Redis client.
        client: RedisClient,
    }

    impl RedisSessionBackend {
        /// Creates a backend on an already connected client.
        pub fn new(client: RedisClient) -> Self {
            Self { client }
        }

        fn key(&self, session_id: &str) -> String {
            self.client.prefixed_key(&keys::session(session_id))
        }

        fn map_err(e: redis::RedisError) -> AppError {
            AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
        }
    }

    #[async_trait]
    impl SessionBackend for RedisSessionBackend {
        async fn put(&self, session_id: &str, principal_id: &str, ttl: Duration) -> AppResult<()> {
            let key = self.key(session_id);
            let mut conn = self.client.conn_mut();

            let reply: Option<String> = redis::cmd("SET")
                .arg(&key)
                .arg(principal_id)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            match reply.as_deref() {
                Some("OK") => Ok(()),
                other => {
                    error!(reply = ?other, "Unexpected reply to session SET");
                    Err(AppError::cache(format!(
                        "session SET returned {other:?} instead of OK"
                    )))
                }
            }
        }

        async fn get(&self, session_id: &str) -> AppResult<Option<String>> {
            let key = self.key(session_id);
            let mut conn = self.client.conn_mut();
            let value: Option<String> = conn.get(&key).await.map_err(Self::map_err)?;
            Ok(value)
        }

        async fn delete(&self, session_id: &str) -> AppResult<u64> {
            let key = self.key(session_id);
            let mut conn = self.client.conn_mut();
            let removed: u64 = conn.del(&key).await.map_err(Self::map_err)?;
            Ok(removed)
        }

        /// Both `SET`s go out in one `MULTI`/`EXEC` block, so Redis applies
        /// both or neither.
        async fn put_pair(
            &self,
            principal_id: &str,
            first: (&str, Duration),
            second: (&str, Duration),
        ) -> AppResult<()> {
            let mut conn = self.client.conn_mut();

            let (first_reply, second_reply): (Option<String>, Option<String>) = redis::pipe()
                .atomic()
                .cmd("SET")
                .arg(self.key(first.0))
                .arg(principal_id)
                .arg("EX")
                .arg(first.1.as_secs().max(1))
                .cmd("SET")
                .arg(self.key(second.0))
                .arg(principal_id)
                .arg("EX")
                .arg(second.1.as_secs().max(1))
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            match (first_reply.as_deref(), second_reply.as_deref()) {
                (Some("OK"), Some("OK")) => Ok(()),
                other => {
                    error!(reply = ?other, "Unexpected reply to session pair SET");
                    Err(AppError::cache(format!(
                        "session pair SET returned {other:?} instead of OK"
                    )))
                }
            }
        }
    }
}

#[cfg(feature = "redis-session")]
pub use implementation::RedisSessionBackend;
