//! 백엔드 HTTP 클라이언트.
//!
//! 모든 요청은 `Cache-Control: no-store`로 전송되며, 토큰이 주어지면
//! `Authorization: Bearer <token>` 헤더를 붙입니다.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopdesk_core::{token_fingerprint, BackendConfig};
use tracing::{debug, warn};

use crate::envelope::{decode_ack, decode_payload, extract_message};
use crate::error::{BackendError, BackendResult};
use crate::events::{AuthFailure, AuthFailureBus};

/// 백엔드 REST API 클라이언트.
///
/// 내부 `reqwest::Client`는 연결 풀을 공유하므로 복제 비용이 낮습니다.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    auth_failures: Option<AuthFailureBus>,
}

impl BackendClient {
    /// 새 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `BackendError::Network`를 반환합니다.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("shopdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Network(format!("HTTP client 생성 실패: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_failures: None,
        })
    }

    /// 인증 실패 버스 연결.
    pub fn with_auth_failure_bus(mut self, bus: AuthFailureBus) -> Self {
        self.auth_failures = Some(bus);
        self
    }

    /// 백엔드 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 경로에 대한 전체 URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(header::CACHE_CONTROL, "no-store")
            .header(header::ACCEPT, "application/json");

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// 요청을 보내고 상태 코드와 본문을 반환.
    ///
    /// 401/403은 인증 실패 버스에 발행한 뒤 `BackendError::Unauthorized`로,
    /// 그 밖의 2xx가 아닌 응답은 `BackendError::Api`로 변환합니다.
    async fn execute(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        token: Option<&str>,
    ) -> BackendResult<(u16, String)> {
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Backend request failed");
            BackendError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(BackendError::from)?;
        debug!(%method, path, status = status.as_u16(), "Backend responded");

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let message = extract_message(&body, status.canonical_reason().unwrap_or("Unauthorized"));
            if let (Some(bus), Some(token)) = (&self.auth_failures, token) {
                bus.publish(AuthFailure::new(
                    token_fingerprint(token),
                    status.as_u16(),
                    message.clone(),
                ));
            }
            return Err(BackendError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            let message = extract_message(&body, status.canonical_reason().unwrap_or("Request failed"));
            warn!(%method, path, status = status.as_u16(), %message, "Backend returned error");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), body))
    }

    /// GET 요청.
    pub async fn get<T, Q>(&self, path: &str, query: Option<&Q>, token: Option<&str>) -> BackendResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut builder = self.builder(Method::GET, path, token);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let (status, body) = self.execute(builder, &Method::GET, path, token).await?;
        decode_payload(status, &body)
    }

    /// JSON 본문을 포함한 요청 (POST/PUT/PATCH).
    pub async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> BackendResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.builder(method.clone(), path, token).json(body);
        let (status, body) = self.execute(builder, &method, path, token).await?;
        decode_payload(status, &body)
    }

    /// 응답 데이터가 필요 없는 DELETE 요청.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> BackendResult<()> {
        let builder = self.builder(Method::DELETE, path, token);
        let (status, body) = self.execute(builder, &Method::DELETE, path, token).await?;
        decode_ack(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = BackendClient::new(&BackendConfig {
            base_url: "http://api.local/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(client.base_url(), "http://api.local");
        assert_eq!(client.url("/api/v1/tags"), "http://api.local/api/v1/tags");
    }
}
