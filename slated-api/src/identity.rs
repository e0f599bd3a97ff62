use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderName};
use uuid::Uuid;

use slated_domain::{Actor, ActorRole};

use crate::error::AppError;

/// Identity headers stamped by the upstream gateway after it has verified
/// the session. Authentication itself lives outside this service; handlers
/// only ever see an explicit `Actor`.
pub const ACTOR_ID_HEADER: HeaderName = HeaderName::from_static("x-actor-id");
pub const ACTOR_ROLE_HEADER: HeaderName = HeaderName::from_static("x-actor-role");

#[derive(Debug, Clone, Copy)]
pub struct ActorIdentity(pub Actor);

impl<S> FromRequestParts<S> for ActorIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(&ACTOR_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthenticationError("missing x-actor-id header".to_string())
            })?;

        let id = Uuid::parse_str(raw_id).map_err(|_| {
            AppError::AuthenticationError("x-actor-id is not a valid id".to_string())
        })?;

        let role = match parts.headers.get(&ACTOR_ROLE_HEADER) {
            None => ActorRole::User,
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| raw.parse::<ActorRole>().ok())
                .ok_or_else(|| {
                    AppError::AuthenticationError("unknown x-actor-role value".to_string())
                })?,
        };

        Ok(ActorIdentity(Actor { id, role }))
    }
}
