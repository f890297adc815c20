//! 리소스별 데이터 접근 함수.
//!
//! 각 리소스는 [`Resource`]를 구현하고, [`ResourceApi`]가 공통 list/get/create/update/delete를
//! 제공합니다. 모든 함수는 선택적 Bearer 토큰을 받습니다.
//!
//! ```rust,ignore
//! let page = client.products().list(&ListQuery::page(1, 20), Some(&session.access_token)).await?;
//! ```

mod catalog;
mod commerce;

pub use catalog::{Attributes, Brands, Categories, Products, Tags};
pub use commerce::{Campaigns, Coupons, Orders, Users};

use std::fmt::Debug;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::client::BackendClient;
use crate::envelope::{ListQuery, Paged};
use crate::error::BackendResult;

/// 백엔드 REST 리소스 정의.
pub trait Resource: Send + Sync + 'static {
    /// 조회 결과 타입
    type Model: DeserializeOwned + Serialize + Debug + Send;
    /// 생성/수정 입력 타입
    type Input: Serialize + DeserializeOwned + Debug + Send + Sync;

    /// 로그/에러 메시지용 이름
    const NAME: &'static str;
    /// 컬렉션 경로 (예: `/api/v1/products`)
    const COLLECTION: &'static str;

    /// 목록 조회 경로.
    fn list_path() -> String {
        Self::COLLECTION.to_string()
    }

    /// 단건 경로.
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::COLLECTION, urlencoding::encode(id))
    }
}

/// 리소스 하나에 대한 데이터 접근 함수 묶음.
pub struct ResourceApi<'a, R: Resource> {
    client: &'a BackendClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceApi<'a, R> {
    pub fn new(client: &'a BackendClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// 목록 조회.
    #[instrument(skip(self, token), fields(resource = R::NAME))]
    pub async fn list(&self, query: &ListQuery, token: Option<&str>) -> BackendResult<Paged<R::Model>> {
        self.client.get(&R::list_path(), Some(query), token).await
    }

    /// 단건 조회.
    #[instrument(skip(self, token), fields(resource = R::NAME))]
    pub async fn get(&self, id: &str, token: Option<&str>) -> BackendResult<R::Model> {
        self.client
            .get(&R::item_path(id), None::<&ListQuery>, token)
            .await
    }

    /// 생성.
    #[instrument(skip(self, input, token), fields(resource = R::NAME))]
    pub async fn create(&self, input: &R::Input, token: Option<&str>) -> BackendResult<R::Model> {
        self.client
            .send_json(Method::POST, R::COLLECTION, input, token)
            .await
    }

    /// 수정.
    #[instrument(skip(self, input, token), fields(resource = R::NAME))]
    pub async fn update(&self, id: &str, input: &R::Input, token: Option<&str>) -> BackendResult<R::Model> {
        self.client
            .send_json(Method::PUT, &R::item_path(id), input, token)
            .await
    }

    /// 삭제.
    #[instrument(skip(self, token), fields(resource = R::NAME))]
    pub async fn delete(&self, id: &str, token: Option<&str>) -> BackendResult<()> {
        self.client.delete(&R::item_path(id), token).await
    }
}

impl BackendClient {
    /// 상품 API.
    pub fn products(&self) -> ResourceApi<'_, Products> {
        ResourceApi::new(self)
    }

    /// 카테고리 API.
    pub fn categories(&self) -> ResourceApi<'_, Categories> {
        ResourceApi::new(self)
    }

    /// 브랜드 API.
    pub fn brands(&self) -> ResourceApi<'_, Brands> {
        ResourceApi::new(self)
    }

    /// 태그 API.
    pub fn tags(&self) -> ResourceApi<'_, Tags> {
        ResourceApi::new(self)
    }

    /// 속성 API.
    pub fn attributes(&self) -> ResourceApi<'_, Attributes> {
        ResourceApi::new(self)
    }

    /// 쿠폰 API.
    pub fn coupons(&self) -> ResourceApi<'_, Coupons> {
        ResourceApi::new(self)
    }

    /// 캠페인 API.
    pub fn campaigns(&self) -> ResourceApi<'_, Campaigns> {
        ResourceApi::new(self)
    }

    /// 주문 API.
    pub fn orders(&self) -> ResourceApi<'_, Orders> {
        ResourceApi::new(self)
    }

    /// 사용자 API.
    pub fn users(&self) -> ResourceApi<'_, Users> {
        ResourceApi::new(self)
    }
}
