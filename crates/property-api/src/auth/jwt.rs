use crate::utils::error::ApiError;
use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Owner ID (Subject)
    pub exp: usize,  // Expiration
    pub role: String,
}

impl Claims {
    /// The authenticated owner's id; property reads are scoped by it
    pub fn owner_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid subject claim".to_string()))
    }
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    pub fn generate_token(&self, owner_id: Uuid, role: &str) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;
        let expiration = now + self.expiration_seconds as usize;

        let claims = Claims {
            sub: owner_id.to_string(),
            exp: expiration,
            role: role.to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let manager = JwtManager::new("test-secret", 3600);
        let owner_id = Uuid::new_v4();

        let token = manager.generate_token(owner_id, "owner").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, owner_id.to_string());
        assert_eq!(claims.role, "owner");
        assert_eq!(claims.owner_id().unwrap(), owner_id);
    }

    #[test]
    fn rejects_token_from_other_secret() {
        let manager = JwtManager::new("secret-a", 3600);
        let other = JwtManager::new("secret-b", 3600);

        let token = other.generate_token(Uuid::new_v4(), "owner").unwrap();
        assert!(manager.validate_token(&token).is_err());
    }
}
