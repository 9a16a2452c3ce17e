//! Pre-check for `ActivityPub` GET requests.

use async_trait::async_trait;
use axum::http::StatusCode;
use tracing::debug;
use yoake_common::AppResult;
use yoake_core::MetaSettingsService;

use crate::signature::SignatureComponents;

/// Decides whether an `ActivityPub` fetch may proceed.
///
/// Anything other than `200 OK` is sent back as-is with an empty body.
#[async_trait]
pub trait FetchAuthorizer: Send + Sync {
    /// Verdict for a request carrying the given `Signature` header, if any.
    async fn authorize(&self, signature: Option<&str>) -> AppResult<StatusCode>;
}

/// [`FetchAuthorizer`] driven by instance settings.
#[derive(Clone)]
pub struct MetaFetchAuthorizer {
    meta_service: MetaSettingsService,
}

impl MetaFetchAuthorizer {
    /// Create an authorizer reading the current instance settings.
    #[must_use]
    pub const fn new(meta_service: MetaSettingsService) -> Self {
        Self { meta_service }
    }
}

#[async_trait]
impl FetchAuthorizer for MetaFetchAuthorizer {
    async fn authorize(&self, signature: Option<&str>) -> AppResult<StatusCode> {
        let meta = self.meta_service.get().await?;

        let Some(header) = signature else {
            return Ok(if meta.secure_mode {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::OK
            });
        };

        let key_host = SignatureComponents::parse(header)
            .ok()
            .and_then(|sig| sig.key_host().ok());

        if let Some(host) = key_host {
            let blocked = meta
                .blocked_host_list()
                .iter()
                .any(|b| b.eq_ignore_ascii_case(&host));
            if blocked {
                debug!(host = %host, "Rejected fetch from blocked host");
                return Ok(StatusCode::FORBIDDEN);
            }
        }

        Ok(StatusCode::OK)
    }
}

/// Lets every request through.
#[derive(Clone, Default)]
pub struct AllowAllFetches;

#[async_trait]
impl FetchAuthorizer for AllowAllFetches {
    async fn authorize(&self, _signature: Option<&str>) -> AppResult<StatusCode> {
        Ok(StatusCode::OK)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;
    use yoake_db::{entities::meta_settings, repositories::MetaSettingsRepository, test_utils};

    const SIGNED: &str = r#"keyId="https://spam.example/users/x#main-key",algorithm="rsa-sha256",headers="date",signature="abc""#;

    fn authorizer(meta: meta_settings::Model) -> MetaFetchAuthorizer {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[meta]])
            .into_connection();
        MetaFetchAuthorizer::new(MetaSettingsService::new(MetaSettingsRepository::new(
            Arc::new(db),
        )))
    }

    #[tokio::test]
    async fn test_open_instance_allows_unsigned() {
        let status = authorizer(test_utils::meta_settings(false, false))
            .authorize(None)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_secure_mode_requires_signature() {
        let status = authorizer(test_utils::meta_settings(true, false))
            .authorize(None)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let status = authorizer(test_utils::meta_settings(true, false))
            .authorize(Some(SIGNED))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_blocked_host_is_forbidden() {
        let mut meta = test_utils::meta_settings(false, false);
        meta.blocked_hosts = json!(["Spam.Example"]);

        let status = authorizer(meta).authorize(Some(SIGNED)).await.unwrap();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
