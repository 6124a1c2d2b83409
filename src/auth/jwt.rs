use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, exp: usize) -> String {
        let claims = Claims {
            sub: "user-1".into(),
            company_id: "company-1".into(),
            role: Role::Manager,
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_tokens_signed_with_the_shared_secret() {
        let claims = verify_token(&token("secret", 4_000_000_000), "secret").unwrap();
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.company_id, "company-1");
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        assert!(verify_token(&token("other", 4_000_000_000), "secret").is_err());
        assert!(verify_token(&token("secret", 1_000), "secret").is_err());
    }
}
