// Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Argon2id cost parameters
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub output_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // OWASP minimum for Argon2id: 19 MiB, 2 iterations, 1 lane
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            output_length: 32,
        }
    }
}

impl PasswordConfig {
    fn build_hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_length),
        )
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password into a PHC string (`$argon2id$v=19$m=19456,t=2,p=1$...`)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_config(password, &PasswordConfig::default())
}

pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let argon2 = config.build_hasher()?;
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingError(e.to_string()))
}

/// Verify a password against a stored PHC hash; parameters are read from the hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationError(e.to_string())),
    }
}

lazy_static! {
    // Login for an unknown email verifies against this so it costs the same Argon2 run
    static ref DUMMY_HASH: Option<String> = hash_password("rti-portal-no-such-account").ok();
}

/// Spend one verification on the dummy hash; always false
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> PasswordConfig {
        PasswordConfig {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            output_length: 32,
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("MySecureP@ssw0rd123!").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("MySecureP@ssw0rd123!", &hash).expect("Failed to verify"));
        assert!(!verify_password("WrongPassword", &hash).expect("Failed to verify"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password_with_config("TestPassword123!", &fast_config()).unwrap();
        let hash2 = hash_password_with_config("TestPassword123!", &fast_config()).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("TestPassword123!", &hash1).unwrap());
        assert!(verify_password("TestPassword123!", &hash2).unwrap());
    }

    #[test]
    fn test_dummy_verification_never_matches() {
        assert!(!verify_dummy_password("rti-portal-no-such-account"));
        assert!(!verify_dummy_password(""));
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not_a_valid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }
}
