//! Cache for seller-listing lookups.
//!
//! Listings change rarely compared to how often buyers press "add to cart",
//! so lookups are kept for five minutes. Empty results are never stored.

use std::time::Duration;

use bazaar_core::{ProductId, ProductSellerId, SellerId};
use moka::future::Cache;

/// Cache key: the product and the optional seller filter.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct PairingKey {
    pub product: ProductId,
    pub seller: Option<SellerId>,
}

/// Seller-listing lookups by product and seller.
#[derive(Clone)]
pub struct PairingCache {
    inner: Cache<PairingKey, Vec<ProductSellerId>>,
}

impl PairingCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(300)) // 5 minutes
                .build(),
        }
    }

    pub async fn get(&self, key: &PairingKey) -> Option<Vec<ProductSellerId>> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: PairingKey, listings: Vec<ProductSellerId>) {
        if listings.is_empty() {
            return;
        }
        self.inner.insert(key, listings).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_results_not_cached() {
        let cache = PairingCache::new();
        let key = PairingKey {
            product: ProductId::new(1),
            seller: None,
        };
        cache.insert(key, Vec::new()).await;
        assert!(cache.get(&key).await.is_none());

        cache.insert(key, vec![ProductSellerId::new(4)]).await;
        assert_eq!(cache.get(&key).await, Some(vec![ProductSellerId::new(4)]));
    }

    #[tokio::test]
    async fn test_seller_filter_is_part_of_key() {
        let cache = PairingCache::new();
        let any = PairingKey {
            product: ProductId::new(1),
            seller: None,
        };
        let one = PairingKey {
            product: ProductId::new(1),
            seller: Some(SellerId::new(2)),
        };
        cache.insert(any, vec![ProductSellerId::new(4)]).await;
        assert!(cache.get(&one).await.is_none());
    }
}
