//! 카탈로그 리소스: 상품, 카테고리, 브랜드, 태그, 속성.

use shopdesk_core::{
    Attribute, AttributeInput, Brand, BrandInput, Category, CategoryInput, Product, ProductInput,
    Tag, TagInput,
};

use super::Resource;

/// `/api/v1/products`
pub struct Products;

impl Resource for Products {
    type Model = Product;
    type Input = ProductInput;
    const NAME: &'static str = "product";
    const COLLECTION: &'static str = "/api/v1/products";
}

/// `/api/v1/categories`
pub struct Categories;

impl Resource for Categories {
    type Model = Category;
    type Input = CategoryInput;
    const NAME: &'static str = "category";
    const COLLECTION: &'static str = "/api/v1/categories";
}

/// `/api/v1/brands`
pub struct Brands;

impl Resource for Brands {
    type Model = Brand;
    type Input = BrandInput;
    const NAME: &'static str = "brand";
    const COLLECTION: &'static str = "/api/v1/brands";
}

/// `/api/v1/tags`
pub struct Tags;

impl Resource for Tags {
    type Model = Tag;
    type Input = TagInput;
    const NAME: &'static str = "tag";
    const COLLECTION: &'static str = "/api/v1/tags";
}

/// `/api/v1/attributes`
pub struct Attributes;

impl Resource for Attributes {
    type Model = Attribute;
    type Input = AttributeInput;
    const NAME: &'static str = "attribute";
    const COLLECTION: &'static str = "/api/v1/attributes";
}
