use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::models::Claims;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::{Value, json};

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let claims = match bearer_claims(&req, &config.jwt_secret) {
        Ok(c) => c,
        Err(body) => {
            let resp = HttpResponse::Unauthorized().json(body);
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let auth_user = AuthUser {
        user_id: claims.sub,
        company_id: claims.company_id,
        role: claims.role,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

/// Claims of a valid bearer token, or the `{error}` body of the 401.
fn bearer_claims(req: &ServiceRequest, secret: &str) -> Result<Claims, Value> {
    let header_value = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| json!({"error": "Missing Authorization header"}))?
        .to_str()
        .map_err(|_| json!({"error": "Invalid Authorization header encoding"}))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| json!({"error": "Authorization header must start with Bearer"}))?;

    verify_token(token, secret)
        .map_err(|e| json!({"error": "Invalid or expired token", "details": e}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;
    use actix_web::test::TestRequest;

    #[test]
    fn every_rejection_is_an_error_object() {
        let missing = TestRequest::default().to_srv_request();
        let not_bearer = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_srv_request();
        let bad_encoding = TestRequest::default()
            .insert_header(("Authorization", HeaderValue::from_bytes(b"Bearer \xff").unwrap()))
            .to_srv_request();
        let garbage = TestRequest::default()
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_srv_request();

        for (req, expected) in [
            (missing, "Missing Authorization header"),
            (not_bearer, "Authorization header must start with Bearer"),
            (bad_encoding, "Invalid Authorization header encoding"),
            (garbage, "Invalid or expired token"),
        ] {
            let body = bearer_claims(&req, "secret").unwrap_err();
            assert_eq!(body["error"], expected);
        }
    }
}
