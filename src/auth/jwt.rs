// JWT token creation and verification
// Tokens carry the principal and its capabilities, with 8-hour expiry

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::access::{Access, Capability};

/// Token lifetime in hours
pub const TOKEN_TTL_HOURS: i64 = 8;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (principal id)
/// * `exp` - Expiry time (seconds since epoch)
/// * `privileges` - Privilege names granted to the principal; the identity
///   provider may list some that mean nothing to this service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    #[serde(default)]
    pub privileges: Vec<String>,
}

impl Claims {
    /// The access rights these claims grant
    ///
    /// Unknown privilege names are ignored.
    pub fn access(&self) -> Access {
        Access::new(
            self.sub,
            self.privileges
                .iter()
                .filter_map(|name| Capability::from_name(name)),
        )
    }
}

#[derive(Debug, Error)]
#[error("invalid token: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Creates a JWT token for a principal
///
/// # Token Properties
/// - Expires after 8 hours
/// - Signed with HS256 algorithm
/// - Contains the principal in 'sub' and capabilities in 'privileges'
///
/// # Example
/// ```
/// use padel_tournament_api::auth::jwt::create_token;
/// use padel_tournament_api::domain::access::Capability;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), &[Capability::ManageEvents], "secret")
///     .expect("valid token");
/// assert!(!token.is_empty());
/// ```
pub fn create_token(
    user_id: Uuid,
    privileges: &[Capability],
    secret: &str,
) -> Result<String, TokenError> {
    let expiry = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
        privileges: privileges.iter().map(|c| c.as_str().to_string()).collect(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Verifies and decodes a JWT token
///
/// Fails on a bad signature, a malformed token or an expired one.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, &[Capability::ManageTeams], TEST_SECRET)
            .expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.privileges, vec!["MANAGE_TEAMS".to_string()]);
    }

    #[test]
    fn privileges_of_other_services_are_ignored() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            privileges: ["MANAGE_EVENTS", "MANAGE_ACCOUNTS", "VIEW_STATISTICS", "MANAGE_PLANNING"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_ref()),
        )
        .unwrap();

        let access = verify_token(&token, TEST_SECRET)
            .expect("foreign privileges must not invalidate the token")
            .access();
        assert!(access.can(Capability::ManageEvents));
        assert!(access.can(Capability::ViewStatistics));
        assert!(!access.can(Capability::ManageTeams));
    }

    #[test]
    fn claims_grant_listed_capabilities_only() {
        let token = create_token(Uuid::new_v4(), &[Capability::ManagePools], TEST_SECRET)
            .expect("valid token");
        let access = verify_token(&token, TEST_SECRET).unwrap().access();

        assert!(access.can(Capability::ManagePools));
        assert!(!access.can(Capability::ManageEvents));
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(Uuid::new_v4(), &[], TEST_SECRET).expect("valid token");
        assert!(verify_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn invalid_token_fails() {
        assert!(verify_token("invalid.token.string", TEST_SECRET).is_err());
    }

    #[test]
    fn token_expiry_set() {
        let token = create_token(Uuid::new_v4(), &[], TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        let expiry_time = claims.exp as i64;
        let now = Utc::now().timestamp();
        let in_8_hours = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp();

        assert!(expiry_time > now);
        assert!(expiry_time <= in_8_hours + 10);
    }
}
