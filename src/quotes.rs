//! Route quote selection.

use crate::carrier_client::GatewayError;
use crate::models::api::RouteOption;
use crate::models::carrier::RouteQuote;

/// Pick the cheapest route: strictly lowest `totalCost`, scanning
/// left-to-right so the first occurrence wins ties. Fails with `NoRoutes` on
/// an empty list.
pub fn cheapest(routes: &[RouteQuote]) -> Result<&RouteQuote, GatewayError> {
    let mut best = routes.first().ok_or(GatewayError::NoRoutes)?;
    for candidate in routes.iter().skip(1) {
        if candidate.total_cost < best.total_cost {
            best = candidate;
        }
    }
    Ok(best)
}

/// Every offered route in its original order, shaped for display.
pub fn rank(routes: &[RouteQuote]) -> Vec<RouteOption> {
    routes.iter().map(RouteOption::from).collect()
}
