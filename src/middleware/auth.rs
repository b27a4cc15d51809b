use actix_web::{Error, HttpMessage, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, Validation, decode};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::post::model::AuthorRef;
use crate::utils::error::CustomError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Moderator,
}

/// Claims issued by the identity service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
    pub exp: usize,
}

/// The authenticated identity performing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn author_ref(&self) -> AuthorRef {
        AuthorRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Actor {
            id: claims.id,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Verifies the bearer token and stores its claims in the request extensions.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(config) = req.app_data::<web::Data<AppConfig>>().cloned() else {
        return Err((
            CustomError::InfrastructureError("auth is not configured".to_string()).into(),
            req,
        ));
    };

    let token_data = match decode::<Claims>(
        credentials.token(),
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => data,
        Err(e) => {
            warn!("rejected bearer token: {}", e);
            return Err((
                CustomError::UnauthorizedError("Invalid token".to_string()).into(),
                req,
            ));
        }
    };

    if config.require_verified_actor && !token_data.claims.verified {
        return Err((
            CustomError::UnauthorizedError("Account is not verified".to_string()).into(),
            req,
        ));
    }

    req.extensions_mut().insert(token_data.claims);
    Ok(req)
}

/// Get the acting identity from request extensions (use after auth middleware)
pub fn current_actor(req: &actix_web::HttpRequest) -> Result<Actor, CustomError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .map(Actor::from)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))
}
