//! 판매 리소스: 쿠폰, 캠페인, 주문, 사용자.

use shopdesk_core::{
    Campaign, CampaignInput, Coupon, CouponInput, Order, OrderInput, UserInput, UserRecord,
};

use super::Resource;

/// `/api/v1/coupons`
pub struct Coupons;

impl Resource for Coupons {
    type Model = Coupon;
    type Input = CouponInput;
    const NAME: &'static str = "coupon";
    const COLLECTION: &'static str = "/api/v1/coupons";
}

/// `/api/v1/admin/campaigns` (관리자 전용 네임스페이스)
pub struct Campaigns;

impl Resource for Campaigns {
    type Model = Campaign;
    type Input = CampaignInput;
    const NAME: &'static str = "campaign";
    const COLLECTION: &'static str = "/api/v1/admin/campaigns";
}

/// `/api/v1/orders`
pub struct Orders;

impl Resource for Orders {
    type Model = Order;
    type Input = OrderInput;
    const NAME: &'static str = "order";
    const COLLECTION: &'static str = "/api/v1/orders";
}

/// `/api/v1/users`
///
/// 목록 조회만 `/api/v1/users/getusers`를 사용합니다.
pub struct Users;

impl Resource for Users {
    type Model = UserRecord;
    type Input = UserInput;
    const NAME: &'static str = "user";
    const COLLECTION: &'static str = "/api/v1/users";

    fn list_path() -> String {
        format!("{}/getusers", Self::COLLECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Products;

    #[test]
    fn test_user_list_path_override() {
        assert_eq!(Users::list_path(), "/api/v1/users/getusers");
        assert_eq!(Users::item_path("u1"), "/api/v1/users/u1");
    }

    #[test]
    fn test_item_path_is_encoded() {
        assert_eq!(Products::item_path("a/b c"), "/api/v1/products/a%2Fb%20c");
        assert_eq!(Campaigns::list_path(), "/api/v1/admin/campaigns");
    }
}
