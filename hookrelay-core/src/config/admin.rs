//! Admin authentication.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Admin credentials. Only the argon2 PHC hash is ever held in memory.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    secret_hash: String,
}

impl AdminConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Check a plaintext secret presented by a client.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plaintext: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.secret_hash) else {
            tracing::error!("Stored admin secret is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::{SaltString, rand_core::OsRng};

    fn hash(secret: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_verify_matches_only_the_secret() {
        let admin = AdminConfig::new(hash("correct horse"));
        assert!(admin.verify("correct horse"));
        assert!(!admin.verify("battery staple"));
        assert!(!admin.verify(""));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let admin = AdminConfig::new("not-a-hash".to_string());
        assert!(!admin.verify("not-a-hash"));
    }
}
