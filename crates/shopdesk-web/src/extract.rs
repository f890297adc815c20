//! 요청 본문/쿼리 추출기.
//!
//! axum 기본 추출기의 거부 응답(평문)을 [`PageError::Validation`]으로 바꿔
//! 다른 에러와 같은 JSON 경계 응답을 돌려줍니다.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::PageError;

/// JSON 본문 추출기.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PageError))]
pub struct PageJson<T>(pub T);

/// 쿼리 문자열 추출기.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PageError))]
pub struct PageQuery<T>(pub T);

/// `application/x-www-form-urlencoded` 본문 추출기.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(PageError))]
pub struct PageForm<T>(pub T);

impl From<JsonRejection> for PageError {
    fn from(rejection: JsonRejection) -> Self {
        PageError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for PageError {
    fn from(rejection: QueryRejection) -> Self {
        PageError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for PageError {
    fn from(rejection: FormRejection) -> Self {
        PageError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Paging {
        #[allow(dead_code)]
        limit: u32,
    }

    #[tokio::test]
    async fn test_invalid_query_becomes_validation_error() {
        let (mut parts, _) = Request::builder()
            .uri("/products?limit=abc")
            .body(())
            .unwrap()
            .into_parts();
        let err = PageQuery::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_json_becomes_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = PageJson::<Paging>::from_request(request, &()).await.unwrap_err();
        assert!(matches!(err, PageError::Validation(_)));
    }
}
