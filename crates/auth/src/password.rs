//! Password hashing and verification utilities using Argon2id.
//!
//! Hashes are stored as PHC-style strings so parameters travel with the
//! hash and can be raised later without invalidating existing accounts.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use rand::{rng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 19 MiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 2)
    pub time_cost:   u32,
    /// Number of lanes (default: 1)
    pub parallelism: u32,
    /// Length of the generated hash (default: 32 bytes)
    pub hash_length: u32,
    /// Length of the salt (default: 16 bytes)
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19_456, // 19 MiB
            time_cost:   2,
            parallelism: 1,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

fn argon2_instance(memory_cost: u32, time_cost: u32, parallelism: u32, hash_length: usize) -> Result<Argon2<'static>, PasswordError> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(memory_cost, time_cost, parallelism, Some(hash_length))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?,
    ))
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `config` - Optional configuration for Argon2id parameters
///
/// # Returns
///
/// The hash encoded as `$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`,
/// wrapped in a `SecretString`.
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    let argon2 = argon2_instance(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        config.hash_length as usize,
    )?;

    let mut output = vec![0u8; config.hash_length as usize];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    let hash_format = format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        BASE64_STANDARD.encode(&salt),
        BASE64_STANDARD.encode(&output)
    );

    Ok(SecretString::from(hash_format))
}

fn parse_param(params: &str, key: char, default: u32) -> u32 {
    params
        .split(',')
        .find_map(|p| p.strip_prefix(key))
        .and_then(|p| p.strip_prefix('='))
        .and_then(|p| p.parse().ok())
        .unwrap_or(default)
}

/// Verifies a password against a stored PHC-style hash.
///
/// Recomputes the hash with the stored salt and parameters and compares in
/// constant time.
///
/// # Errors
///
/// Returns `VerificationFailed` on mismatch and `InvalidHashFormat` when the
/// stored string is not a well-formed Argon2id hash.
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    // Splitting by '$' gives: ["", "argon2id", "v=19", "m=..,t=..,p=..", "<salt>", "<hash>"]
    let parts: Vec<&str> = expected_hash.split('$').collect();
    if parts.len() != 6 {
        return Err(PasswordError::InvalidHashFormat);
    }

    if parts[1] != "argon2id" || parts[2] != "v=19" {
        return Err(PasswordError::InvalidHashFormat);
    }

    let params_str = parts[3];
    let defaults = PasswordConfig::default();
    let memory_cost = parse_param(params_str, 'm', defaults.memory_cost);
    let time_cost = parse_param(params_str, 't', defaults.time_cost);
    let parallelism = parse_param(params_str, 'p', defaults.parallelism);

    let salt = BASE64_STANDARD.decode(parts[4])?;
    let stored_hash = BASE64_STANDARD.decode(parts[5])?;

    let argon2 = argon2_instance(memory_cost, time_cost, parallelism, stored_hash.len())?;

    let mut computed_hash = vec![0u8; stored_hash.len()];
    argon2
        .hash_password_into(
            password.expose_secret().as_bytes(),
            &salt,
            &mut computed_hash,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    use subtle::ConstantTimeEq;
    if computed_hash.as_slice().ct_eq(&stored_hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Account password policy: minimum 8 characters, maximum 128, not entirely
/// numeric, and not containing the account's username.
///
/// # Arguments
///
/// * `password` - The candidate password
/// * `username` - The account username, when known at validation time
///
/// # Returns
///
/// `Ok(())` or the list of violated rules.
pub fn validate_password_strength(
    password: &str,
    username: Option<&str>,
) -> Result<(), Vec<PasswordValidationError>> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push(PasswordValidationError::TooShort);
    }

    if password.chars().count() > 128 {
        errors.push(PasswordValidationError::TooLong);
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::EntirelyNumeric);
    }

    if let Some(username) = username {
        if !username.is_empty() &&
            password
                .to_lowercase()
                .contains(&username.to_lowercase())
        {
            errors.push(PasswordValidationError::ContainsUsername);
        }
    }

    if errors.is_empty() {
        Ok(())
    }
    else {
        Err(errors)
    }
}

/// Errors for password validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must be at most 128 characters long")]
    TooLong,

    #[error("Password cannot be entirely numeric")]
    EntirelyNumeric,

    #[error("Password cannot contain the username")]
    ContainsUsername,
}
