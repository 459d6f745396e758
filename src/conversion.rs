//! Mapping logic from storefront and webhook shapes to carrier payloads.
//!
//! Everything here is pure: inputs are validated and defaulted before any
//! network call happens, so a carrier request built by this module is always
//! complete from the carrier's point of view.
//!
//! Destination mapping:
//! - name → contactName (default "Customer")
//! - company → companyName (default "")
//! - country defaults to "AU"; phone/email default to ""
//! - street/suburb/state/postcode are required
//!
//! Item mapping (battery freight defaults):
//! - quantity → 1, length → 100, width → 50, height → 30, weight → 25
//! - description falls back to the item name, then to "Battery"
//! - consignment items additionally carry itemReference from the SKU

use crate::carrier_client::GatewayError;
use crate::models::api::{
    ConsignmentApiRequest, DestinationAddress, ForkliftFlag, ItemInput, QuoteApiRequest,
};
use crate::models::carrier::{ConsignmentRequest, Item, Location, QuoteRequest};
use crate::models::order::OrderEvent;

pub const DEFAULT_ITEM_LENGTH: f64 = 100.0;
pub const DEFAULT_ITEM_WIDTH: f64 = 50.0;
pub const DEFAULT_ITEM_HEIGHT: f64 = 30.0;
pub const DEFAULT_ITEM_WEIGHT: f64 = 25.0;
pub const DEFAULT_ITEM_QUANTITY: u32 = 1;
pub const DEFAULT_ITEM_DESCRIPTION: &str = "Battery";

/// Custom-field identifier the commerce platform uses for the "forklift
/// available on site?" question.
const FORKLIFT_FIELD_ID: &str = "171656000002394353";

/// Map a storefront destination into the carrier's location shape.
///
/// Fails when any of street/suburb/state/postcode is missing or blank; the
/// carrier rejects incomplete locations, so the call is never attempted.
pub fn map_destination(dest: &DestinationAddress) -> Result<Location, GatewayError> {
    let mut missing = Vec::new();
    let street = required_text(&dest.street, "street", &mut missing);
    let suburb = required_text(&dest.suburb, "suburb", &mut missing);
    let state = required_text(&dest.state, "state", &mut missing);
    let postcode = required_text(&dest.postcode, "postcode", &mut missing);

    if !missing.is_empty() {
        return Err(GatewayError::Validation(format!(
            "destination address is missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(Location {
        contact_name: text_or(&dest.name, "Customer"),
        company_name: text_or(&dest.company, ""),
        street,
        suburb,
        state,
        postcode,
        country: text_or(&dest.country, "AU"),
        phone: text_or(&dest.phone, ""),
        email: text_or(&dest.email, ""),
    })
}

/// Map storefront items for a quote request. Fails on an empty list.
pub fn map_quote_items(items: &[ItemInput]) -> Result<Vec<Item>, GatewayError> {
    if items.is_empty() {
        return Err(GatewayError::Validation("at least one item is required".into()));
    }
    Ok(items.iter().map(map_item).collect())
}

/// Map storefront items for a consignment request: same defaults as a quote,
/// plus an itemReference sourced from the SKU (empty when absent).
pub fn map_consignment_items(items: &[ItemInput]) -> Result<Vec<Item>, GatewayError> {
    let mapped = map_quote_items(items)?;
    Ok(mapped
        .into_iter()
        .zip(items.iter())
        .map(|(mut item, input)| {
            item.item_reference = Some(text_or(&input.sku, ""));
            item
        })
        .collect())
}

fn map_item(item: &ItemInput) -> Item {
    Item {
        quantity: match item.quantity {
            Some(q) if q > 0 => q,
            _ => DEFAULT_ITEM_QUANTITY,
        },
        length: dimension_or(item.length, DEFAULT_ITEM_LENGTH),
        width: dimension_or(item.width, DEFAULT_ITEM_WIDTH),
        height: dimension_or(item.height, DEFAULT_ITEM_HEIGHT),
        weight: dimension_or(item.weight, DEFAULT_ITEM_WEIGHT),
        item_description: first_text(&[&item.description, &item.name])
            .unwrap_or_else(|| DEFAULT_ITEM_DESCRIPTION.to_string()),
        item_reference: None,
    }
}

/// Whether the receiver has a forklift; absent means no, so a tail lift is
/// booked.
pub fn forklift_available(flag: Option<&ForkliftFlag>) -> bool {
    flag.map(ForkliftFlag::available).unwrap_or(false)
}

/// Compose a carrier quote request. Battery shipments are always declared
/// dangerous goods.
pub fn build_quote_request(
    company_id: i64,
    warehouse: &Location,
    request: &QuoteApiRequest,
) -> Result<QuoteRequest, GatewayError> {
    let destination = request
        .destination_address
        .as_ref()
        .ok_or_else(|| GatewayError::Validation("destination_address is required".into()))?;

    Ok(QuoteRequest {
        company_id,
        from_location: warehouse.clone(),
        to_location: map_destination(destination)?,
        items: map_quote_items(&request.items)?,
        dangerous_goods: true,
        tail_lift_required: !forklift_available(request.forklift_available.as_ref()),
    })
}

/// Compose a carrier consignment request.
///
/// `customer_email` (when given) replaces the destination email so tracking
/// notifications reach the buyer rather than the address book entry. Both
/// `customerReference` and `orderNumber` carry the order number.
pub fn build_consignment_request(
    company_id: i64,
    warehouse: &Location,
    request: &ConsignmentApiRequest,
) -> Result<ConsignmentRequest, GatewayError> {
    let order_number = request
        .order_number
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::Validation("order_number is required".into()))?;
    let destination = request
        .destination_address
        .as_ref()
        .ok_or_else(|| GatewayError::Validation("destination_address is required".into()))?;

    let mut to_location = map_destination(destination)?;
    if let Some(email) = request
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        to_location.email = email.to_string();
    }

    Ok(ConsignmentRequest {
        company_id,
        from_location: warehouse.clone(),
        to_location,
        items: map_consignment_items(&request.items)?,
        dangerous_goods: true,
        tail_lift_required: !forklift_available(request.forklift_available.as_ref()),
        customer_reference: order_number.to_string(),
        order_number: order_number.to_string(),
    })
}

/// Translate a commerce order event into the normalized consignment request
/// the booking path consumes.
///
/// Forklift availability comes from the order's custom-field list: the
/// pre-agreed field compared against the literal "yes"; an absent field means
/// no forklift. Fails when the order carries no line items.
pub fn order_event_to_consignment(
    event: &OrderEvent,
) -> Result<ConsignmentApiRequest, GatewayError> {
    if event.line_items.is_empty() {
        return Err(GatewayError::Validation("order contains no line items".into()));
    }

    let forklift = event.custom_fields.iter().any(|field| {
        field.customfield_id.as_deref() == Some(FORKLIFT_FIELD_ID)
            && field
                .value
                .as_deref()
                .map(|v| v.trim().eq_ignore_ascii_case("yes"))
                .unwrap_or(false)
    });

    let shipping = event.shipping_address.clone().unwrap_or_default();
    let destination = DestinationAddress {
        name: first_text(&[&shipping.attention, &event.customer_name]),
        company: shipping.company_name.clone(),
        street: shipping.address.clone(),
        suburb: shipping.city.clone(),
        state: shipping.state_code.clone(),
        postcode: shipping.zip.clone(),
        country: shipping.country_code.clone(),
        phone: shipping.phone.clone(),
        email: event.customer_email.clone(),
    };

    let items = event
        .line_items
        .iter()
        .map(|line| {
            let package = line.package_details.clone().unwrap_or_default();
            ItemInput {
                quantity: line.quantity,
                length: package.length,
                width: package.width,
                height: package.height,
                weight: package.weight,
                description: line.name.clone(),
                name: None,
                sku: line.sku.clone(),
            }
        })
        .collect();

    Ok(ConsignmentApiRequest {
        order_number: event.salesorder_number.clone(),
        destination_address: Some(destination),
        items,
        forklift_available: Some(ForkliftFlag::Flag(forklift)),
        customer_email: event.customer_email.clone(),
    })
}

fn dimension_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v > 0.0 => v,
        _ => default,
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn first_text(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_text(value: &Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => {
            missing.push(field);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{CustomField, OrderLineItem, OrderShippingAddress, PackageDetails};

    fn sydney_destination() -> DestinationAddress {
        DestinationAddress {
            name: Some("Test Customer".into()),
            street: Some("1 Market St".into()),
            suburb: Some("Sydney".into()),
            state: Some("NSW".into()),
            postcode: Some("2000".into()),
            ..Default::default()
        }
    }

    fn warehouse() -> Location {
        Location {
            contact_name: "Dispatch".into(),
            street: "Melbourne CBD".into(),
            suburb: "Melbourne".into(),
            state: "VIC".into(),
            postcode: "3000".into(),
            country: "AU".into(),
            ..Default::default()
        }
    }

    #[test]
    fn item_defaults_fill_every_dimensional_field() {
        let items = vec![ItemInput {
            quantity: Some(2),
            description: Some("Battery 12V".into()),
            ..Default::default()
        }];
        let mapped = map_quote_items(&items).unwrap();

        assert_eq!(mapped[0].quantity, 2);
        assert_eq!(mapped[0].length, 100.0);
        assert_eq!(mapped[0].width, 50.0);
        assert_eq!(mapped[0].height, 30.0);
        assert_eq!(mapped[0].weight, 25.0);
        assert_eq!(mapped[0].item_description, "Battery 12V");
        assert!(mapped[0].item_reference.is_none());
    }

    #[test]
    fn zero_and_absent_values_both_fall_back() {
        let items = vec![ItemInput {
            quantity: Some(0),
            weight: Some(0.0),
            length: Some(120.0),
            description: Some("   ".into()),
            name: Some("Starter pack".into()),
            ..Default::default()
        }];
        let mapped = map_quote_items(&items).unwrap();

        assert_eq!(mapped[0].quantity, 1);
        assert_eq!(mapped[0].weight, 25.0);
        assert_eq!(mapped[0].length, 120.0);
        assert_eq!(mapped[0].item_description, "Starter pack");
    }

    #[test]
    fn description_falls_back_to_battery() {
        let mapped = map_quote_items(&[ItemInput::default()]).unwrap();
        assert_eq!(mapped[0].item_description, "Battery");
    }

    #[test]
    fn empty_item_list_fails_validation() {
        assert!(matches!(
            map_quote_items(&[]),
            Err(GatewayError::Validation(_))
        ));
    }

    #[test]
    fn consignment_items_carry_a_reference() {
        let items = vec![
            ItemInput {
                sku: Some("BAT-12V".into()),
                ..Default::default()
            },
            ItemInput::default(),
        ];
        let mapped = map_consignment_items(&items).unwrap();
        assert_eq!(mapped[0].item_reference.as_deref(), Some("BAT-12V"));
        assert_eq!(mapped[1].item_reference.as_deref(), Some(""));
    }

    #[test]
    fn destination_requires_the_routing_fields() {
        let dest = DestinationAddress {
            name: Some("Test Customer".into()),
            street: Some("1 Market St".into()),
            ..Default::default()
        };
        let err = map_destination(&dest).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("suburb"));
        assert!(message.contains("state"));
        assert!(message.contains("postcode"));
        assert!(!message.contains("street"));
    }

    #[test]
    fn destination_defaults_are_applied() {
        let dest = DestinationAddress {
            street: Some("1 Market St".into()),
            suburb: Some("Sydney".into()),
            state: Some("NSW".into()),
            postcode: Some("2000".into()),
            ..Default::default()
        };
        let location = map_destination(&dest).unwrap();
        assert_eq!(location.contact_name, "Customer");
        assert_eq!(location.company_name, "");
        assert_eq!(location.country, "AU");
        assert_eq!(location.phone, "");
        assert_eq!(location.email, "");
    }

    #[test]
    fn quote_request_always_declares_dangerous_goods() {
        let request = QuoteApiRequest {
            destination_address: Some(sydney_destination()),
            items: vec![ItemInput {
                quantity: Some(2),
                description: Some("Battery 12V".into()),
                ..Default::default()
            }],
            forklift_available: None,
        };
        let quote = build_quote_request(42, &warehouse(), &request).unwrap();

        assert!(quote.dangerous_goods);
        assert!(quote.tail_lift_required);
        assert_eq!(quote.company_id, 42);
        assert_eq!(quote.to_location.suburb, "Sydney");
        assert_eq!(quote.items[0].quantity, 2);
    }

    #[test]
    fn forklift_answer_strings_are_understood() {
        assert!(forklift_available(Some(&ForkliftFlag::Answer("yes".into()))));
        assert!(forklift_available(Some(&ForkliftFlag::Answer("Yes ".into()))));
        assert!(!forklift_available(Some(&ForkliftFlag::Answer("no".into()))));
        assert!(forklift_available(Some(&ForkliftFlag::Flag(true))));
        assert!(!forklift_available(None));
    }

    #[test]
    fn consignment_request_mirrors_the_order_number() {
        let request = ConsignmentApiRequest {
            order_number: Some("SO-00042".into()),
            destination_address: Some(sydney_destination()),
            items: vec![ItemInput {
                sku: Some("BAT-12V".into()),
                ..Default::default()
            }],
            forklift_available: Some(ForkliftFlag::Answer("yes".into())),
            customer_email: Some("buyer@example.com".into()),
        };
        let consignment = build_consignment_request(42, &warehouse(), &request).unwrap();

        assert_eq!(consignment.customer_reference, "SO-00042");
        assert_eq!(consignment.order_number, "SO-00042");
        assert!(!consignment.tail_lift_required);
        assert_eq!(consignment.to_location.email, "buyer@example.com");
        assert_eq!(
            consignment.items[0].item_reference.as_deref(),
            Some("BAT-12V")
        );
    }

    #[test]
    fn consignment_requires_an_order_number() {
        let request = ConsignmentApiRequest {
            order_number: Some("  ".into()),
            destination_address: Some(sydney_destination()),
            items: vec![ItemInput::default()],
            forklift_available: None,
            customer_email: None,
        };
        assert!(matches!(
            build_consignment_request(42, &warehouse(), &request),
            Err(GatewayError::Validation(_))
        ));
    }

    fn order_event() -> OrderEvent {
        OrderEvent {
            salesorder_number: Some("SO-00042".into()),
            customer_name: Some("Jess Chen".into()),
            customer_email: Some("jess@example.com".into()),
            custom_fields: Vec::new(),
            shipping_address: Some(OrderShippingAddress {
                attention: None,
                company_name: Some("Chen Electrical".into()),
                address: Some("1 Market St".into()),
                city: Some("Sydney".into()),
                state_code: Some("NSW".into()),
                zip: Some("2000".into()),
                country_code: None,
                phone: Some("0400000000".into()),
            }),
            line_items: vec![OrderLineItem {
                quantity: Some(3),
                name: Some("Battery 12V".into()),
                sku: Some("BAT-12V".into()),
                package_details: Some(PackageDetails {
                    weight: Some(28.0),
                    ..Default::default()
                }),
            }],
        }
    }

    #[test]
    fn webhook_without_forklift_field_books_a_tail_lift() {
        let translated = order_event_to_consignment(&order_event()).unwrap();
        assert!(!forklift_available(translated.forklift_available.as_ref()));

        let consignment = build_consignment_request(42, &warehouse(), &translated).unwrap();
        assert!(consignment.tail_lift_required);
    }

    #[test]
    fn webhook_forklift_field_is_honored() {
        let mut event = order_event();
        event.custom_fields = vec![
            CustomField {
                customfield_id: Some("999".into()),
                value: Some("yes".into()),
            },
            CustomField {
                customfield_id: Some("171656000002394353".into()),
                value: Some("yes".into()),
            },
        ];
        let translated = order_event_to_consignment(&event).unwrap();
        assert!(forklift_available(translated.forklift_available.as_ref()));
    }

    #[test]
    fn webhook_maps_the_shipping_address_and_items() {
        let translated = order_event_to_consignment(&order_event()).unwrap();
        let destination = translated.destination_address.as_ref().unwrap();

        // attention is absent, so the customer name is the contact
        assert_eq!(destination.name.as_deref(), Some("Jess Chen"));
        assert_eq!(destination.suburb.as_deref(), Some("Sydney"));
        assert_eq!(destination.postcode.as_deref(), Some("2000"));
        assert_eq!(translated.order_number.as_deref(), Some("SO-00042"));

        let items = map_consignment_items(&translated.items).unwrap();
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].weight, 28.0);
        assert_eq!(items[0].length, 100.0);
        assert_eq!(items[0].item_description, "Battery 12V");
        assert_eq!(items[0].item_reference.as_deref(), Some("BAT-12V"));
    }

    #[test]
    fn webhook_without_line_items_fails_validation() {
        let mut event = order_event();
        event.line_items.clear();
        assert!(matches!(
            order_event_to_consignment(&event),
            Err(GatewayError::Validation(_))
        ));
    }
}
