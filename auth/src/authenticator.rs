use uuid::Uuid;

use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// Authenticated subject
    pub subject: Uuid,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            expires_in: issued.expires_in,
            subject: issued.subject,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(password_hasher: PasswordHasher, jwt_handler: JwtHandler) -> Self {
        Self {
            password_hasher,
            jwt_handler,
        }
    }

    /// Create an authenticator with default hashing cost from a PEM key pair.
    ///
    /// # Errors
    /// * `JwtError::InvalidKey` - Either key could not be parsed
    pub fn from_rsa_pem(private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<Self, JwtError> {
        Ok(Self::new(
            PasswordHasher::new(),
            JwtHandler::from_rsa_pem(private_key_pem, public_key_pem)?,
        ))
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Burn one key derivation for a subject that does not exist.
    pub fn simulate_password_check(&self, password: &str) {
        self.password_hasher.verify_decoy(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupted or derivation failed
    /// * `JwtError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: Uuid,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject)?)
    }

    /// Issue a token without password verification.
    pub fn issue_token(&self, subject: Uuid) -> Result<AuthenticationResult, JwtError> {
        self.jwt_handler.issue(subject).map(AuthenticationResult::from)
    }

    /// Verify a bearer token and return the subject it was issued for.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, JwtError> {
        self.jwt_handler.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::HashParams;

    const PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/private_key.pem");
    const PUBLIC_KEY: &[u8] = include_bytes!("../tests/fixtures/public_key.pem");

    fn authenticator() -> Authenticator {
        Authenticator::new(
            PasswordHasher::with_params(HashParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            }),
            JwtHandler::from_rsa_pem(PRIVATE_KEY, PUBLIC_KEY).expect("Failed to load test keys"),
        )
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();
        let subject = Uuid::now_v7();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("my_password", &hash, subject)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert_eq!(result.expires_in, 86_400);
        assert_eq!(result.subject, subject);

        let verified = authenticator
            .verify_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(verified, subject);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("wrong_password", &hash, Uuid::now_v7());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupted_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("my_password", "$argon2id$v=19", Uuid::now_v7());
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(PasswordError::MalformedHash(_)))
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().verify_token("invalid.token.here");
        assert!(result.is_err());
    }
}
