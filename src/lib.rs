#![forbid(unsafe_code)]
#![doc = r#"
Freightgate

Translate storefront orders and quote requests into carrier bookings via the MachShip API.

Crate highlights
- Library: pure mapping in `conversion`, route selection in `quotes`, and the outbound `CarrierClient` gateway.
- HTTP server (in `server`): quote, consignment, order-webhook, and auth-probe endpoints.
- Auth: the carrier's accepted header scheme is negotiated per call from a fixed candidate list; session cookies are cached in-memory for 30 minutes.

Modules
- `models`: Data structures for the storefront API, the carrier wire format, and order webhooks.
- `conversion`: Mapping logic from storefront/webhook shapes to carrier payloads.
- `auth`: Header-scheme candidates and the session cookie cache.
- `carrier_client`: Outbound calls to the carrier API.
- `quotes`: Cheapest-route selection and display ranking.
- `server`: Actix-web router/handlers.
- `util`: Shared helpers (tracing, env, app state).

Note: keep the payload shapes aligned with the carrier's complex-items endpoints; field names are theirs, not ours.
"#]

pub mod auth;
pub mod carrier_client;
pub mod conversion;
pub mod models;
pub mod quotes;
pub mod server;
pub mod util;

// Re-export the primary gateway pieces for ergonomic library use.
pub use crate::auth::{candidate_headers, AuthAttempt, AuthScheme, SessionCache, SESSION_TTL};
pub use crate::carrier_client::{CarrierClient, CarrierConfig, GatewayError};
pub use crate::conversion::{
    build_consignment_request, build_quote_request, order_event_to_consignment,
};
pub use crate::quotes::{cheapest, rank};

// Re-export model namespaces for convenience (downstream users can do `use freightgate::carrier`).
pub use crate::models::{api, carrier, order};
