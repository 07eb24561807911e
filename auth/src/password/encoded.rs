use std::fmt;
use std::str::FromStr;

use argon2::Params;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use super::errors::PasswordError;

/// Algorithm tag written as the first field of every encoded hash.
pub const ALGORITHM_ID: &str = "argon2id";

/// Argon2 version 1.3, the only one this codec derives with.
pub const VERSION: u32 = 0x13;

/// Largest memory cost a stored hash may ask for (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Largest iteration count a stored hash may ask for.
pub const MAX_ITERATIONS: u32 = 16;

/// Largest lane count a stored hash may ask for.
pub const MAX_PARALLELISM: u32 = 16;

/// Tunable Argon2id cost parameters.
///
/// They travel inside every encoded hash so that hashes created under older
/// settings keep verifying after the defaults change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashParams {
    pub(crate) fn to_argon2(self, output_len: usize) -> Result<Params, argon2::Error> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(output_len),
        )
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 2,
        }
    }
}

/// Parsed form of `$argon2id$v=19$m=<memory>,t=<iterations>,p=<parallelism>$<salt>$<key>`.
///
/// Salt and key use unpadded standard base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub params: HashParams,
    pub salt: Vec<u8>,
    pub key: Vec<u8>,
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM_ID,
            VERSION,
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.key),
        )
    }
}

impl FromStr for EncodedHash {
    type Err = PasswordError;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = encoded.split('$').collect();
        if fields.len() != 6 || !fields[0].is_empty() {
            return Err(malformed(format!(
                "expected 6 '$'-separated fields, found {}",
                fields.len()
            )));
        }

        if fields[1] != ALGORITHM_ID {
            return Err(malformed(format!("unknown algorithm '{}'", fields[1])));
        }

        let version = fields[2]
            .strip_prefix("v=")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| malformed("unparseable version field"))?;
        if version != VERSION {
            return Err(PasswordError::UnsupportedVersion {
                found: version,
                expected: VERSION,
            });
        }

        let params = parse_params(fields[3])?;

        let salt = STANDARD_NO_PAD
            .decode(fields[4])
            .map_err(|e| malformed(format!("salt is not valid base64: {}", e)))?;
        if salt.len() < argon2::MIN_SALT_LEN {
            return Err(malformed(format!("salt too short ({} bytes)", salt.len())));
        }

        let key = STANDARD_NO_PAD
            .decode(fields[5])
            .map_err(|e| malformed(format!("key is not valid base64: {}", e)))?;

        // Rejects zero costs and key lengths argon2 cannot produce.
        params
            .to_argon2(key.len())
            .map_err(|e| malformed(format!("invalid cost parameters: {}", e)))?;

        Ok(Self { params, salt, key })
    }
}

fn parse_params(field: &str) -> Result<HashParams, PasswordError> {
    let mut parts = field.split(',');
    let memory_kib = parse_param(parts.next(), "m")?;
    let iterations = parse_param(parts.next(), "t")?;
    let parallelism = parse_param(parts.next(), "p")?;

    if parts.next().is_some() {
        return Err(malformed("unexpected extra cost parameter"));
    }

    // Stored hashes are untrusted input; refuse costs that would exhaust the host.
    for (name, value, max) in [
        ("m", memory_kib, MAX_MEMORY_KIB),
        ("t", iterations, MAX_ITERATIONS),
        ("p", parallelism, MAX_PARALLELISM),
    ] {
        if value > max {
            return Err(malformed(format!(
                "cost parameter '{}' = {} exceeds limit {}",
                name, value, max
            )));
        }
    }

    Ok(HashParams {
        memory_kib,
        iterations,
        parallelism,
    })
}

fn parse_param(part: Option<&str>, name: &str) -> Result<u32, PasswordError> {
    part.and_then(|p| p.strip_prefix(name))
        .and_then(|p| p.strip_prefix('='))
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| malformed(format!("unparseable cost parameter '{}'", name)))
}

fn malformed(reason: impl Into<String>) -> PasswordError {
    PasswordError::MalformedHash(reason.into())
}
