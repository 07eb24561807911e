use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::errors::JwtError;

/// Issuer written into and expected from every token unless overridden.
pub const DEFAULT_ISSUER: &str = "http://localhost";

/// Fixed access token lifetime.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

const RSA_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub subject: Uuid,
}

/// JWT token handler using RSA signatures (RS256).
///
/// A handler built with [`JwtHandler::verifier_from_rsa_pem`] holds only the
/// public key and can verify but not issue.
pub struct JwtHandler {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtHandler {
    /// Create a handler able to issue and verify tokens.
    ///
    /// # Arguments
    /// * `private_key_pem` - PEM-encoded RSA private key (PKCS#1 or PKCS#8)
    /// * `public_key_pem` - PEM-encoded RSA public key
    ///
    /// # Errors
    /// * `InvalidKey` - Either key could not be parsed
    pub fn from_rsa_pem(private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let mut handler = Self::verifier_from_rsa_pem(public_key_pem)?;
        handler.encoding_key = Some(encoding_key);
        Ok(handler)
    }

    /// Create a verify-only handler from a PEM-encoded RSA public key.
    pub fn verifier_from_rsa_pem(public_key_pem: &[u8]) -> Result<Self, JwtError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key: None,
            decoding_key,
            issuer: DEFAULT_ISSUER.to_string(),
        })
    }

    /// Set the issuer written into new tokens and required on verification.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a 24 hour token for `subject`.
    ///
    /// # Errors
    /// * `Signing` - No private key configured or signing failed
    pub fn issue(&self, subject: Uuid) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(
            subject,
            self.issuer.clone(),
            Duration::seconds(TOKEN_LIFETIME_SECS),
        );
        let token = self.encode(&claims)?;

        Ok(IssuedToken {
            token,
            expires_in: claims.lifetime_secs(),
            subject,
        })
    }

    /// Sign arbitrary claims with RS256.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| JwtError::Signing("no private key configured".to_string()))?;

        encode(&Header::new(Algorithm::RS256), claims, key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// Tokens whose header declares anything other than an RSA algorithm are
    /// rejected before the signature is looked at. Expiry and not-before are
    /// checked with zero leeway.
    ///
    /// # Errors
    /// * `InvalidSignatureMethod` - Header algorithm is not RS256/RS384/RS512
    /// * `InvalidOrExpiredToken` - Malformed, bad signature, wrong issuer,
    ///   expired or not yet valid
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(map_jwt_error)?;
        if !RSA_ALGORITHMS.contains(&header.alg) {
            return Err(JwtError::InvalidSignatureMethod(format!("{:?}", header.alg)));
        }

        let mut validation = Validation::new(header.alg);
        validation.algorithms = RSA_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(map_jwt_error)?;

        Ok(token_data.claims)
    }

    /// Decode a token and return its subject identifier.
    ///
    /// # Errors
    /// * `MalformedSubject` - `sub` is absent or not a UUID
    pub fn verify(&self, token: &str) -> Result<Uuid, JwtError> {
        self.decode(token)?.subject_id()
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> JwtError {
    let reason = match err.kind() {
        ErrorKind::InvalidAlgorithm => {
            return JwtError::InvalidSignatureMethod("algorithm does not match key".to_string())
        }
        ErrorKind::ExpiredSignature => "token expired".to_string(),
        ErrorKind::ImmatureSignature => "token not yet valid".to_string(),
        ErrorKind::InvalidSignature => "signature mismatch".to_string(),
        ErrorKind::InvalidIssuer => "unexpected issuer".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim '{}'", claim),
        ErrorKind::InvalidToken => "malformed token".to_string(),
        ErrorKind::Base64(_) => "invalid base64 encoding".to_string(),
        ErrorKind::Json(_) => "invalid JSON in token".to_string(),
        _ => format!("validation failed: {}", err),
    };

    JwtError::InvalidOrExpiredToken(reason)
}
