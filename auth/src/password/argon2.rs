use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Version;
use subtle::ConstantTimeEq;

use super::encoded::EncodedHash;
use super::encoded::HashParams;
use super::errors::PasswordError;

/// Length of the random salt generated for every new hash.
pub const SALT_LENGTH: usize = 16;

/// Length of the derived key stored in every new hash.
pub const KEY_LENGTH: usize = 32;

/// Password hashing implementation.
///
/// Derives Argon2id keys and writes them in the self-describing
/// `$argon2id$v=19$m=..,t=..,p=..$salt$key` format.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: HashParams,
}

impl PasswordHasher {
    /// Create a hasher with the default cost (64 MiB, 3 iterations, 2 lanes).
    pub fn new() -> Self {
        Self::with_params(HashParams::default())
    }

    /// Create a hasher that writes new hashes with the given cost.
    ///
    /// Verification always uses the cost recorded in the stored hash.
    pub fn with_params(params: HashParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> HashParams {
        self.params
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `Entropy` - The operating system random source failed
    /// * `HashingFailed` - Key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::Entropy(e.to_string()))?;

        let key = derive(password, &salt, self.params, KEY_LENGTH)?;

        Ok(EncodedHash {
            params: self.params,
            salt: salt.to_vec(),
            key,
        }
        .to_string())
    }

    /// Verify a password against a stored encoded hash.
    ///
    /// The key is re-derived with the parameters parsed from `encoded` and
    /// compared in constant time.
    ///
    /// # Errors
    /// * `MalformedHash` - Field count, numbers or base64 are invalid
    /// * `UnsupportedVersion` - Hash was produced by another Argon2 version
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let stored: EncodedHash = encoded.parse()?;
        let derived = derive(password, &stored.salt, stored.params, stored.key.len())?;

        Ok(derived.ct_eq(&stored.key).into())
    }

    /// Spend one key derivation at the current cost without comparing anything.
    ///
    /// Used when there is no stored hash to check against so the caller
    /// pays the same price as a real verification.
    pub fn verify_decoy(&self, password: &str) {
        let _ = derive(password, &[0u8; SALT_LENGTH], self.params, KEY_LENGTH);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive(
    password: &str,
    salt: &[u8],
    params: HashParams,
    key_length: usize,
) -> Result<Vec<u8>, PasswordError> {
    let params = params
        .to_argon2(key_length)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = vec![0u8; key_length];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(key)
}
