//! 백엔드 응답 봉투 및 목록 조회 타입.
//!
//! 백엔드는 보통 `{ success, message, data }` 형태로 응답하지만 일부 엔드포인트는
//! 데이터를 그대로 반환합니다. 두 형태 모두 여기서 타입이 있는 값으로 변환됩니다.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BackendError, BackendResult};

/// 목록 조회 파라미터.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// 페이지 지정 조회.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            search: None,
        }
    }

    /// 검색어 설정.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// 페이지 단위 목록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paged<T> {
    /// 빈 목록 (백엔드 실패 시 화면 기본값).
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
        }
    }

    /// 항목 수.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 목록 응답의 두 가지 형태: 배열 그대로, 또는 페이지 정보가 있는 객체.
#[derive(Deserialize)]
#[serde(untagged)]
enum PagedRepr<T> {
    Plain(Vec<T>),
    Object {
        #[serde(alias = "docs", alias = "results", alias = "data")]
        items: Vec<T>,
        #[serde(default, alias = "totalItems", alias = "count")]
        total: Option<u64>,
        #[serde(default, alias = "currentPage")]
        page: Option<u32>,
        #[serde(default, alias = "pageSize")]
        limit: Option<u32>,
    },
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Paged<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match PagedRepr::<T>::deserialize(deserializer)? {
            PagedRepr::Plain(items) => Paged {
                total: items.len() as u64,
                page: 1,
                limit: items.len() as u32,
                items,
            },
            PagedRepr::Object {
                items,
                total,
                page,
                limit,
            } => Paged {
                total: total.unwrap_or(items.len() as u64),
                page: page.unwrap_or(1),
                limit: limit.unwrap_or(items.len() as u32),
                items,
            },
        })
    }
}

/// 에러 응답 본문에서 메시지 추출.
///
/// `message`, `error`, `error.message` 순으로 찾고, 없으면 `fallback`을 반환합니다.
pub fn extract_message(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback.to_string();
    };

    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// 2xx 응답 본문을 타입이 있는 값으로 디코딩.
///
/// - `success: false` 이면 `BackendError::Api`
/// - `data` 필드가 있으면 그 값을, 없으면 본문 전체를 디코딩
pub fn decode_payload<T: DeserializeOwned>(status: u16, body: &str) -> BackendResult<T> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?
    };

    if let Some(false) = value.get("success").and_then(Value::as_bool) {
        return Err(BackendError::Api {
            status,
            message: extract_message(body, "Request failed"),
        });
    }

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| BackendError::Decode(e.to_string()))
}

/// 본문이 필요 없는 응답(삭제 등)의 성공 여부만 확인.
pub fn decode_ack(status: u16, body: &str) -> BackendResult<()> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) if value.get("success").and_then(Value::as_bool) == Some(false) => {
            Err(BackendError::Api {
                status,
                message: extract_message(body, "Request failed"),
            })
        }
        _ => Ok(()),
    }
}
