//! Remote product API.

mod client;
mod product;

pub use client::{HttpProductApi, ProductApi, DEFAULT_PRODUCT_TIMEOUT};
pub use product::{Product, Rating};
