//! Outbound authentication for the carrier API.
//!
//! The carrier's accepted header scheme is not pinned down by its
//! documentation, so every plausible encoding of the configured token is
//! produced in a fixed priority order and tried per call until one is
//! accepted. A session cookie issued by the carrier is cached in a single
//! in-memory slot for a bounded time and attached to subsequent requests.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a carrier-issued session cookie stays usable.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// A named header-construction strategy for the configured token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` — the documented scheme, tried first.
    BearerAuthorization,
    /// `X-API-Key: <token>`
    XApiKey,
    /// `api-key: <token>`
    ApiKey,
    /// `Authorization: Token <token>`
    TokenAuthorization,
}

impl AuthScheme {
    /// Fixed trial order.
    pub const PRIORITY: [AuthScheme; 4] = [
        AuthScheme::BearerAuthorization,
        AuthScheme::XApiKey,
        AuthScheme::ApiKey,
        AuthScheme::TokenAuthorization,
    ];

    /// Short name used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            AuthScheme::BearerAuthorization => "authorization-bearer",
            AuthScheme::XApiKey => "x-api-key",
            AuthScheme::ApiKey => "api-key",
            AuthScheme::TokenAuthorization => "authorization-token",
        }
    }

    fn header(self, token: &str) -> (&'static str, String) {
        match self {
            AuthScheme::BearerAuthorization => ("Authorization", format!("Bearer {token}")),
            AuthScheme::XApiKey => ("X-API-Key", token.to_string()),
            AuthScheme::ApiKey => ("api-key", token.to_string()),
            AuthScheme::TokenAuthorization => ("Authorization", format!("Token {token}")),
        }
    }
}

/// One concrete header encoding of the configured token.
#[derive(Debug, Clone)]
pub struct AuthAttempt {
    pub scheme: AuthScheme,
    pub header_name: &'static str,
    pub header_value: String,
}

/// Produce every candidate header encoding of `raw_token`, in trial order.
///
/// Tokens pasted from API consoles sometimes arrive with a `Bearer ` prefix
/// already attached; it is stripped first so the Authorization encodings never
/// double it.
pub fn candidate_headers(raw_token: &str) -> Vec<AuthAttempt> {
    let token = normalize_token(raw_token);
    AuthScheme::PRIORITY
        .iter()
        .map(|&scheme| {
            let (header_name, header_value) = scheme.header(token);
            AuthAttempt {
                scheme,
                header_name,
                header_value,
            }
        })
        .collect()
}

/// Trim the configured token and drop a case-insensitive `Bearer ` prefix.
pub fn normalize_token(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}

#[derive(Debug, Clone)]
struct Session {
    cookie: String,
    expires_at: Instant,
}

/// Single-slot cache for the carrier-issued session cookie.
///
/// Concurrent logins may race on the slot; last write wins. The cookie is
/// advisory and re-derivable via a fresh login, so no stronger coordination is
/// needed.
#[derive(Debug, Default)]
pub struct SessionCache {
    slot: Mutex<Option<Session>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with a cookie expiring `ttl` from now.
    pub fn store(&self, cookie: String, ttl: Duration) {
        self.store_at(cookie, ttl, Instant::now());
    }

    pub fn store_at(&self, cookie: String, ttl: Duration, now: Instant) {
        let session = Session {
            cookie,
            expires_at: now + ttl,
        };
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session);
        }
    }

    /// True iff a session exists and has not expired.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot
                .as_ref()
                .map(|session| now < session.expires_at)
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// The cached cookie, while the session is still live.
    pub fn current_cookie(&self) -> Option<String> {
        self.current_cookie_at(Instant::now())
    }

    pub fn current_cookie_at(&self, now: Instant) -> Option<String> {
        let slot = self.slot.lock().ok()?;
        slot.as_ref()
            .filter(|session| now < session.expires_at)
            .map(|session| session.cookie.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_follow_priority_order() {
        let attempts = candidate_headers("tok-123");
        let schemes: Vec<AuthScheme> = attempts.iter().map(|a| a.scheme).collect();
        assert_eq!(schemes, AuthScheme::PRIORITY.to_vec());

        assert_eq!(attempts[0].header_name, "Authorization");
        assert_eq!(attempts[0].header_value, "Bearer tok-123");
        assert_eq!(attempts[1].header_name, "X-API-Key");
        assert_eq!(attempts[1].header_value, "tok-123");
        assert_eq!(attempts[2].header_name, "api-key");
        assert_eq!(attempts[2].header_value, "tok-123");
        assert_eq!(attempts[3].header_name, "Authorization");
        assert_eq!(attempts[3].header_value, "Token tok-123");
    }

    #[test]
    fn bearer_prefix_is_never_doubled() {
        for raw in [
            "Bearer tok-123",
            "bearer tok-123",
            "BEARER tok-123",
            "  Bearer tok-123  ",
        ] {
            let attempts = candidate_headers(raw);
            assert_eq!(attempts[0].header_value, "Bearer tok-123", "input: {raw:?}");
            assert!(
                !attempts[0].header_value.contains("Bearer Bearer"),
                "input: {raw:?}"
            );
            assert_eq!(attempts[1].header_value, "tok-123");
        }
    }

    #[test]
    fn plain_token_passes_through_trimmed() {
        assert_eq!(normalize_token("  tok-123 "), "tok-123");
        // "bearer" without the trailing space is part of the token, not a prefix
        assert_eq!(normalize_token("bearertok"), "bearertok");
    }

    #[test]
    fn session_cache_starts_invalid() {
        let cache = SessionCache::new();
        assert!(!cache.is_valid());
        assert!(cache.current_cookie().is_none());
    }

    #[test]
    fn stored_session_is_valid_until_ttl_elapses() {
        let cache = SessionCache::new();
        let now = Instant::now();
        cache.store_at("ms=abc".to_string(), SESSION_TTL, now);

        assert!(cache.is_valid_at(now));
        assert!(cache.is_valid_at(now + SESSION_TTL - Duration::from_secs(1)));
        assert_eq!(cache.current_cookie_at(now).as_deref(), Some("ms=abc"));

        assert!(!cache.is_valid_at(now + SESSION_TTL));
        assert!(cache.current_cookie_at(now + SESSION_TTL).is_none());
    }

    #[test]
    fn store_overwrites_the_single_slot() {
        let cache = SessionCache::new();
        let now = Instant::now();
        cache.store_at("ms=old".to_string(), SESSION_TTL, now);
        cache.store_at("ms=new".to_string(), SESSION_TTL, now);
        assert_eq!(cache.current_cookie_at(now).as_deref(), Some("ms=new"));
    }
}
