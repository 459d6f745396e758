//! Wire shapes for the carrier API.
//!
//! The carrier speaks camelCase JSON; every struct here renames accordingly.
//! Response structs default optional fields so a sparse carrier payload still
//! deserializes.

use serde::{Deserialize, Serialize};

/// A pickup or delivery location in the carrier's shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub contact_name: String,
    #[serde(default)]
    pub company_name: String,
    pub street: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// One line item on a quote or consignment request.
///
/// `item_reference` is only populated on consignment requests; quote requests
/// omit it entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub quantity: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub item_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_reference: Option<String>,
}

/// Body of the route quote lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub company_id: i64,
    pub from_location: Location,
    pub to_location: Location,
    pub items: Vec<Item>,
    pub dangerous_goods: bool,
    pub tail_lift_required: bool,
}

/// Body of the consignment creation call.
///
/// Same fields as [`QuoteRequest`] plus the order metadata; the carrier wants
/// `customerReference` and `orderNumber` even though both carry the order
/// number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentRequest {
    pub company_id: i64,
    pub from_location: Location,
    pub to_location: Location,
    pub items: Vec<Item>,
    pub dangerous_goods: bool,
    pub tail_lift_required: bool,
    pub customer_reference: String,
    pub order_number: String,
}

/// One shipping route offered by the carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    #[serde(default)]
    pub carrier_name: String,
    #[serde(default)]
    pub service_name: String,
    pub total_cost: f64,
    #[serde(default)]
    pub total_transit_days: f64,
    #[serde(default)]
    pub route_id: i64,
}

/// Envelope of the quote lookup response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteList {
    #[serde(default)]
    pub routes: Vec<RouteQuote>,
}

/// Result of a successful consignment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentResult {
    pub consignment_id: i64,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub carrier_name: String,
}
