//! Request and response bodies for the HTTP surface exposed to the storefront.

use serde::{Deserialize, Serialize};

use crate::models::carrier::RouteQuote;

/// Destination address as the storefront sends it.
///
/// Every field is optional at the parsing layer; `conversion::map_destination`
/// enforces which ones are actually required before any carrier call is made.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DestinationAddress {
    pub name: Option<String>,
    pub company: Option<String>,
    pub street: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// One shipment item as the storefront sends it. Dimensional fields that are
/// absent or zero get the battery-freight defaults during mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    pub quantity: Option<u32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub sku: Option<String>,
}

/// Forklift availability flag. Callers send either a boolean or the literal
/// `"yes"`/`"no"` answer captured on the order form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ForkliftFlag {
    Flag(bool),
    Answer(String),
}

impl ForkliftFlag {
    /// True only for an explicit `true` or a case-insensitive `"yes"`.
    pub fn available(&self) -> bool {
        match self {
            ForkliftFlag::Flag(value) => *value,
            ForkliftFlag::Answer(answer) => answer.trim().eq_ignore_ascii_case("yes"),
        }
    }
}

/// Body of `POST /api/get-shipping-quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteApiRequest {
    pub destination_address: Option<DestinationAddress>,
    #[serde(default)]
    pub items: Vec<ItemInput>,
    pub forklift_available: Option<ForkliftFlag>,
}

/// Body of `POST /api/create-consignment`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsignmentApiRequest {
    pub order_number: Option<String>,
    pub destination_address: Option<DestinationAddress>,
    #[serde(default)]
    pub items: Vec<ItemInput>,
    pub forklift_available: Option<ForkliftFlag>,
    pub customer_email: Option<String>,
}

/// One route in the `all_options` list of a quote response.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOption {
    pub carrier: String,
    pub service: String,
    pub cost: f64,
    pub transit_days: f64,
}

impl From<&RouteQuote> for RouteOption {
    fn from(route: &RouteQuote) -> Self {
        Self {
            carrier: route.carrier_name.clone(),
            service: route.service_name.clone(),
            cost: route.total_cost,
            transit_days: route.total_transit_days,
        }
    }
}

/// Response of `POST /api/get-shipping-quote`.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteApiResponse {
    pub success: bool,
    pub shipping_cost: f64,
    pub carrier: String,
    pub service: String,
    pub transit_days: f64,
    pub route_id: i64,
    pub all_options: Vec<RouteOption>,
}

/// Response of `POST /api/create-consignment` (and the webhook's `consignment`
/// field).
#[derive(Debug, Clone, Serialize)]
pub struct ConsignmentApiResponse {
    pub success: bool,
    pub consignment_id: i64,
    pub tracking_number: String,
    pub carrier: String,
    pub message: String,
}
