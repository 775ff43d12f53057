/// Argon2id password hashing with a fixed, process-wide work factor
use crate::error::{ApiError, ApiResult};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

/// 19 MiB memory, 2 passes, 1 lane
const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// One-way salted password hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the fixed Argon2id parameters
    pub fn new() -> ApiResult<Self> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(|e| ApiError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// The result is a PHC string embedding algorithm, parameters and salt.
    pub fn hash(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Check a password against a stored digest.
    ///
    /// A digest that does not parse counts as a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new().unwrap();
        let first = hasher.hash("Secret123!").unwrap();
        let second = hasher.hash("Secret123!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Secret123!", &first));
        assert!(hasher.verify("Secret123!", &second));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hasher = PasswordHasher::new().unwrap();
        let digest = hasher.hash("Secret123!").unwrap();

        assert!(!hasher.verify("secret123!", &digest));
        assert!(!hasher.verify("", &digest));
    }

    #[test]
    fn test_malformed_digest_is_a_mismatch() {
        let hasher = PasswordHasher::new().unwrap();

        assert!(!hasher.verify("Secret123!", "not-a-phc-string"));
        assert!(!hasher.verify("Secret123!", ""));
        assert!(!hasher.verify("Secret123!", "$2a$10$abcdefghijklmnopqrstuv"));
    }

    #[test]
    fn test_digest_uses_argon2id() {
        let hasher = PasswordHasher::new().unwrap();
        let digest = hasher.hash("Secret123!").unwrap();

        assert!(digest.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }
}
