//! Actix-web router and handlers for the gateway's HTTP surface.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::{info, warn};

use crate::carrier_client::GatewayError;
use crate::conversion;
use crate::models::api::{ConsignmentApiRequest, ConsignmentApiResponse, QuoteApiRequest, QuoteApiResponse};
use crate::models::order::OrderEvent;
use crate::quotes;
use crate::util::AppState;

/// Configure Actix-web routes with AppState.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/", web::get().to(home))
            .route("/health", web::get().to(health))
            .route("/api/carrier-auth-test", web::get().to(auth_test))
            .route("/api/get-shipping-quote", web::post().to(get_shipping_quote))
            .route("/api/create-consignment", web::post().to(create_consignment))
            .route("/api/order-webhook", web::post().to(order_webhook)),
    );
}

async fn home() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Freight gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// Probe carrier authentication without booking anything.
async fn auth_test(state: web::Data<AppState>) -> impl Responder {
    match state.carrier.verify_auth().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Carrier authentication working",
        })),
        Err(err) => gateway_error_response(&err),
    }
}

/// Quote a shipment and answer with the cheapest viable route plus the full
/// option list.
async fn get_shipping_quote(
    state: web::Data<AppState>,
    payload: web::Json<QuoteApiRequest>,
) -> impl Responder {
    info!("quote requested for {} item(s)", payload.items.len());

    let request = match conversion::build_quote_request(state.company_id, &state.warehouse, &payload)
    {
        Ok(request) => request,
        Err(err) => return gateway_error_response(&err),
    };

    let routes = match state.carrier.quote_routes(&request).await {
        Ok(routes) => routes,
        Err(err) => return gateway_error_response(&err),
    };

    let best = match quotes::cheapest(&routes) {
        Ok(best) => best,
        Err(err) => return gateway_error_response(&err),
    };
    info!(
        carrier = %best.carrier_name,
        cost = best.total_cost,
        "cheapest of {} route(s)",
        routes.len()
    );

    HttpResponse::Ok().json(QuoteApiResponse {
        success: true,
        shipping_cost: best.total_cost,
        carrier: best.carrier_name.clone(),
        service: best.service_name.clone(),
        transit_days: best.total_transit_days,
        route_id: best.route_id,
        all_options: quotes::rank(&routes),
    })
}

async fn create_consignment(
    state: web::Data<AppState>,
    payload: web::Json<ConsignmentApiRequest>,
) -> impl Responder {
    match book_consignment(&state, &payload).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => gateway_error_response(&err),
    }
}

/// Translate a commerce order event and book it directly — the booking path
/// is the same in-process function the consignment endpoint uses.
async fn order_webhook(state: web::Data<AppState>, payload: web::Json<OrderEvent>) -> impl Responder {
    info!(
        order = payload.salesorder_number.as_deref().unwrap_or("<unknown>"),
        "order webhook received"
    );

    let consignment = match conversion::order_event_to_consignment(&payload) {
        Ok(consignment) => consignment,
        Err(err) => return gateway_error_response(&err),
    };

    match book_consignment(&state, &consignment).await {
        Ok(result) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order processed",
            "consignment": result,
        })),
        Err(err) => gateway_error_response(&err),
    }
}

/// Shared booking path for the consignment endpoint and the order webhook.
async fn book_consignment(
    state: &AppState,
    payload: &ConsignmentApiRequest,
) -> Result<ConsignmentApiResponse, GatewayError> {
    let request = conversion::build_consignment_request(state.company_id, &state.warehouse, payload)?;
    let result = state.carrier.create_consignment(&request).await?;
    info!(
        order = %request.order_number,
        consignment = result.consignment_id,
        carrier = %result.carrier_name,
        "consignment created"
    );

    Ok(ConsignmentApiResponse {
        success: true,
        consignment_id: result.consignment_id,
        tracking_number: result.tracking_number,
        carrier: result.carrier_name,
        message: "Consignment created successfully".to_string(),
    })
}

/// Map gateway failures onto HTTP statuses for the caller. Upstream bodies
/// are passed through for diagnosis; transport failures surface message-only.
fn gateway_error_response(err: &GatewayError) -> HttpResponse {
    warn!("request failed: {err}");
    match err {
        GatewayError::Validation(message) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message,
        })),
        GatewayError::NoRoutes => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "No shipping routes available",
        })),
        GatewayError::Upstream { status, body } => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": "Carrier rejected the request",
            "status": status,
            "details": body,
        })),
        GatewayError::Decode(message) => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": "Unexpected carrier response",
            "message": message,
        })),
        GatewayError::Network(message) => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": "Carrier unreachable",
            "message": message,
        })),
    }
}
