//! In-process backend for page logic tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bazaar_core::{
    AuthMode, CartLine, CartLineId, Price, ProductId, ProductSellerId, Quantity, SellerId,
};
use rust_decimal::Decimal;

use super::{ApiError, CartBackend};

#[derive(Default)]
struct State {
    listings: BTreeMap<ProductId, Vec<(SellerId, ProductSellerId, Decimal)>>,
    lines: Vec<CartLine>,
    next_id: i64,
    list_delays: VecDeque<Duration>,
    fail_next: Option<u16>,
    calls: Vec<String>,
}

/// Cart backend held in memory. Records every call.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_listing(
        self,
        product: i64,
        seller: i64,
        product_seller: i64,
        price: &str,
    ) -> Self {
        let price = price.parse().unwrap_or_default();
        self.lock()
            .listings
            .entry(ProductId::new(product))
            .or_default()
            .push((SellerId::new(seller), ProductSellerId::new(product_seller), price));
        self
    }

    pub fn with_line(self, id: i64, quantity: u32, price: &str) -> Self {
        {
            let mut state = self.lock();
            state.lines.push(CartLine {
                id: CartLineId::new(id),
                product_seller: ProductSellerId::new(id * 100),
                quantity: Quantity::new(quantity).unwrap_or(Quantity::ONE),
                unit_price: Price::usd(price.parse().unwrap_or_default()),
            });
            state.next_id = state.next_id.max(id);
        }
        self
    }

    /// Delay the next `list_lines` responses, in call order.
    pub fn delay_lists(&self, delays: &[Duration]) {
        self.lock().list_delays.extend(delays.iter().copied());
    }

    /// Make the next call fail with this status.
    pub fn fail_next(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn begin(&self, call: String) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(status) => Err(ApiError::Status {
                status,
                message: "injected failure".into(),
            }),
            None => Ok(()),
        }
    }
}

impl CartBackend for MemoryBackend {
    async fn find_product_sellers(
        &self,
        product: ProductId,
        seller: Option<SellerId>,
    ) -> Result<Vec<ProductSellerId>, ApiError> {
        self.begin(format!("find {product}"))?;
        let state = self.lock();
        Ok(state
            .listings
            .get(&product)
            .map(|listings| {
                listings
                    .iter()
                    .filter(|(s, _, _)| seller.is_none_or(|wanted| wanted == *s))
                    .map(|(_, ps, _)| *ps)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_line(
        &self,
        _auth: AuthMode,
        product_seller: ProductSellerId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        self.begin(format!("create {product_seller}"))?;
        let mut state = self.lock();
        let price = state
            .listings
            .values()
            .flatten()
            .find(|(_, ps, _)| *ps == product_seller)
            .map(|(_, _, price)| *price)
            .ok_or_else(|| ApiError::NotFound(format!("product seller {product_seller}")))?;
        state.next_id += 1;
        let line = CartLine {
            id: CartLineId::new(state.next_id),
            product_seller,
            quantity,
            unit_price: Price::usd(price),
        };
        state.lines.push(line.clone());
        Ok(line)
    }

    async fn list_lines(&self, _auth: AuthMode) -> Result<Vec<CartLine>, ApiError> {
        self.begin("list".into())?;
        let (delay, lines) = {
            let mut state = self.lock();
            (state.list_delays.pop_front(), state.lines.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(lines)
    }

    async fn update_line(
        &self,
        _auth: AuthMode,
        line: CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        self.begin(format!("update {line} {quantity}"))?;
        let mut state = self.lock();
        let existing = state
            .lines
            .iter_mut()
            .find(|l| l.id == line)
            .ok_or_else(|| ApiError::NotFound(format!("cart line {line}")))?;
        existing.quantity = quantity;
        Ok(existing.clone())
    }

    async fn delete_line(&self, line: CartLineId) -> Result<(), ApiError> {
        self.begin(format!("delete {line}"))?;
        let mut state = self.lock();
        let before = state.lines.len();
        state.lines.retain(|l| l.id != line);
        if state.lines.len() == before {
            return Err(ApiError::NotFound(format!("cart line {line}")));
        }
        Ok(())
    }
}
