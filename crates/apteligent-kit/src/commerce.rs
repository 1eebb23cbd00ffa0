//! Commerce event vocabulary and expansion into generic events.

use crate::types::Event;
use std::collections::HashMap;

/// Product action carried by a commerce event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    AddToCart,
    RemoveFromCart,
    AddToWishlist,
    RemoveFromWishlist,
    Checkout,
    CheckoutOption,
    Click,
    ViewDetail,
    Purchase,
    Refund,
}

impl ProductAction {
    /// Host wire key for this action; also keys vendor transactions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductAction::AddToCart => "add_to_cart",
            ProductAction::RemoveFromCart => "remove_from_cart",
            ProductAction::AddToWishlist => "add_to_wishlist",
            ProductAction::RemoveFromWishlist => "remove_from_wishlist",
            ProductAction::Checkout => "checkout",
            ProductAction::CheckoutOption => "checkout_option",
            ProductAction::Click => "click",
            ProductAction::ViewDetail => "view_detail",
            ProductAction::Purchase => "purchase",
            ProductAction::Refund => "refund",
        }
    }
}

/// A single product attached to a commerce event.
#[derive(Debug, Clone)]
pub struct Product {
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub quantity: f64,
}

impl Product {
    /// Create a product with quantity 1.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            sku: None,
            price,
            quantity: 1.0,
        }
    }

    /// Set the SKU.
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Set the quantity.
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Transaction-level attributes of a commerce event.
#[derive(Debug, Clone, Default)]
pub struct TransactionAttributes {
    pub id: Option<String>,
    pub revenue: Option<f64>,
}

impl TransactionAttributes {
    /// Create transaction attributes with the given revenue.
    pub fn with_revenue(revenue: f64) -> Self {
        Self {
            id: None,
            revenue: Some(revenue),
        }
    }

    /// Set the transaction id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Commerce event from the host vocabulary.
///
/// Owned by the host framework; the kit consumes it per call and never
/// retains it.
#[derive(Debug, Clone)]
pub struct CommerceEvent {
    pub action: ProductAction,
    pub products: Vec<Product>,
    pub transaction_attributes: Option<TransactionAttributes>,
    pub attributes: HashMap<String, String>,
}

impl CommerceEvent {
    /// Create a commerce event for the given action.
    pub fn new(action: ProductAction) -> Self {
        Self {
            action,
            products: Vec::new(),
            transaction_attributes: None,
            attributes: HashMap::new(),
        }
    }

    /// Attach a product.
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Attach transaction attributes.
    pub fn with_transaction_attributes(mut self, attributes: TransactionAttributes) -> Self {
        self.transaction_attributes = Some(attributes);
        self
    }

    /// Attach a custom attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Expand into generic events, one per product plus a transaction total
    /// when transaction attributes are present.
    ///
    /// This is the host framework's expansion; actions with no vendor
    /// transaction primitive are forwarded through the generic event path.
    pub fn expand(&self) -> Vec<Event> {
        let action = self.action.as_str();
        let mut events = Vec::with_capacity(self.products.len() + 1);

        if let Some(transaction) = &self.transaction_attributes {
            let mut total = Event::new(format!("eCommerce - {action} - Total"));
            if let Some(id) = &transaction.id {
                total = total.with_attribute("Transaction Id", id.clone());
            }
            if let Some(revenue) = transaction.revenue {
                total = total.with_attribute("Revenue", revenue.to_string());
            }
            events.push(total);
        }

        for product in &self.products {
            let mut item = Event::new(format!("eCommerce - {action} - Item"));
            item.attributes.extend(
                self.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
            item = item
                .with_attribute("Name", product.name.clone())
                .with_attribute("Item Price", product.price.to_string())
                .with_attribute("Quantity", product.quantity.to_string());
            if let Some(sku) = &product.sku {
                item = item.with_attribute("Id", sku.clone());
            }
            events.push(item);
        }

        events
    }
}
