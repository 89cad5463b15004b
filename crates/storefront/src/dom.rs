//! Element IDs and classes the storefront markup exposes.
//!
//! These names are a contract with the storefront's scripts and styles.
//! The askama templates read them from here, and the log renderer keys its
//! output by them.

use bazaar_core::CartLineId;

/// Cart total display.
pub const TOTAL_PRICE: &str = "total_price";

/// Row of one cart line.
#[must_use]
pub fn cart_row(line: CartLineId) -> String {
    format!("product_cart_{line}")
}

/// Quantity input of one cart line.
#[must_use]
pub fn quantity_input(line: CartLineId) -> String {
    format!("input_{line}")
}

/// Subtotal display of one cart line.
#[must_use]
pub fn line_price(line: CartLineId) -> String {
    format!("product_price_{line}")
}

/// Order wizard markup.
pub mod order {
    pub const ROOT: &str = "Order";
    pub const MENU_COLUMN: &str = "Section-column";
    pub const MENU_ITEM: &str = "menu-item";
    pub const MENU_ITEM_ACTIVE: &str = "menu-item_ACTIVE";
    pub const MENU_LINK: &str = "menu-link";
    pub const BLOCK: &str = "Order-block";
    pub const BLOCK_OPEN: &str = "Order-block_OPEN";
    pub const NEXT: &str = "Order-next";
    /// Hidden input holding the numeric order total.
    pub const TOTAL_INPUT: &str = "total-price";
    /// Visible order total.
    pub const CART_PRICE: &str = "Cart-price";
}

/// Checkout form inputs.
pub mod form {
    pub const FULL_NAME: &str = "fio";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "mail";
    pub const DELIVERY_STANDARD: &str = "delivery_type_1";
    pub const DELIVERY_EXPRESS: &str = "delivery_type_2";
    pub const CITY: &str = "city";
    pub const ADDRESS: &str = "address";
    pub const PAYMENT_CARD: &str = "type_1";
    pub const PAYMENT_RANDOM_ACCOUNT: &str = "type_2";
    /// Input mask applied to [`PHONE`].
    pub const PHONE_MASK: &str = "+7 (999) 999-99-99";
}

/// Read-only summary fields on the last wizard step.
pub mod summary {
    pub const FULL_NAME: &str = "user_fio";
    pub const PHONE: &str = "user_phone";
    pub const EMAIL: &str = "user_email";
    pub const DELIVERY_TYPE: &str = "user_delivery_type";
    pub const CITY: &str = "user_city";
    pub const ADDRESS: &str = "user_delivery_address";
    pub const PAYMENT_TYPE: &str = "user_payment_type";
}
