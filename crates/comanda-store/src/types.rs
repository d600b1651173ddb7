use chrono::{DateTime, Utc};
use comanda_core::types::{OrderStatus, UserRole};
use serde::{Deserialize, Serialize};

/// Buyer profile with optional delivery address fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub address_number: Option<String>,
    pub complement: Option<String>,
    pub zip: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub address_number: Option<String>,
    pub complement: Option<String>,
    pub zip: Option<String>,
    pub recipient: Option<String>,
}

/// Partial update: absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub address_number: Option<String>,
    pub complement: Option<String>,
    pub zip: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
}

/// Staff account. The stored password never appears here — user responses
/// must not echo credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: UserRole,
    pub email: String,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub role: UserRole,
    pub email: String,
    pub password: String,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
}

/// Delivery window bounds are pre-validated HH:MM strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub max_time_delivery: Option<String>,
    pub min_time_delivery: Option<String>,
    pub order_status: OrderStatus,
    pub customer_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub date: DateTime<Utc>,
    pub max_time_delivery: Option<String>,
    pub min_time_delivery: Option<String>,
    pub order_status: OrderStatus,
    pub customer_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub date: Option<DateTime<Utc>>,
    pub max_time_delivery: Option<String>,
    pub min_time_delivery: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub quantity: i64,
    pub price: f64,
    pub product_id: i64,
    pub order_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDraft {
    pub quantity: i64,
    pub price: f64,
    pub product_id: i64,
    pub order_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPatch {
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub product_id: Option<i64>,
    pub order_id: Option<i64>,
}

/// Line item with its product hydrated, as returned inside an order listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemWithProduct {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Product,
}

/// An order with its customer and line items attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithRelations {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub order_product: Vec<OrderItemWithProduct>,
}
