//! Zoho Commerce sales-order webhook payload.
//!
//! Read-only input; only the fields the gateway consumes are modeled, the rest
//! of the webhook body is ignored during deserialization.

use serde::Deserialize;

/// The order event delivered to `POST /api/order-webhook`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderEvent {
    pub salesorder_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub shipping_address: Option<OrderShippingAddress>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
}

/// One entry of the order's custom-field list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomField {
    pub customfield_id: Option<String>,
    pub value: Option<String>,
}

/// The order's shipping address sub-record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderShippingAddress {
    pub attention: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

/// One ordered line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderLineItem {
    pub quantity: Option<u32>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub package_details: Option<PackageDetails>,
}

/// Package dimensions recorded against a line item, when the catalog has them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDetails {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}
