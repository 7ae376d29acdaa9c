//! Caller identity extraction and role checks.
//!
//! This service sits behind an authenticating reverse proxy that verifies the
//! caller's credentials and forwards the resulting identity in request
//! headers. The handlers trust that identity as given; no tokens or passwords
//! are handled here.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    member::{MemberId, Role},
};

/// The header carrying the authenticated caller's member ID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// The header carrying the authenticated caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller of a request.
///
/// Route handlers receive this via `Extension(identity): Extension<Identity>`
/// once the request has passed through [identity_guard].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity {
    /// The caller's member ID.
    pub member_id: MemberId,
    /// The caller's role.
    pub role: Role,
}

/// Parse the caller identity from the forwarded headers.
///
/// Returns `None` if either header is missing or malformed.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let member_id = headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()?;

    let role = Role::parse(headers.get(USER_ROLE_HEADER)?.to_str().ok()?)?;

    Some(Identity {
        member_id: MemberId::new(member_id),
        role,
    })
}

/// Middleware that requires a caller identity on the request.
///
/// The identity is placed into the request extensions and the request executed
/// normally if the headers are valid, otherwise a 401 response is returned.
pub async fn identity_guard(mut request: Request, next: Next) -> Response {
    let identity = match identity_from_headers(request.headers()) {
        Some(identity) => identity,
        None => {
            tracing::warn!(
                "rejecting request to {} with missing or malformed identity headers",
                request.uri().path()
            );
            return Error::IdentityMissing.into_response();
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Middleware that rejects callers without the admin role.
///
/// Must run after [identity_guard] so the identity extension is present.
pub async fn admin_guard(request: Request, next: Next) -> Response {
    match request.extensions().get::<Identity>() {
        Some(identity) if identity.role == Role::Admin => next.run(request).await,
        Some(_) => Error::AdminOnly.into_response(),
        None => Error::IdentityMissing.into_response(),
    }
}
