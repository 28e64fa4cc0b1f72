use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("hash password: {e}"))
}

/// Check a plaintext password against a stored hash. A mismatch is `false`;
/// a malformed stored hash is a fault, not a failed login.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("parse password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_hashed_password() {
        let hash = hash_password("password").expect("hashing should succeed");
        assert!(verify_password("password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn rejects_a_different_password() {
        let hash = hash_password("password").expect("hashing should succeed");
        assert!(!verify_password("helloworld", &hash).expect("verify should succeed"));
    }

    #[test]
    fn salts_make_repeated_hashes_distinct() {
        let first = hash_password("password").expect("hashing should succeed");
        let second = hash_password("password").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn errors_on_a_malformed_stored_hash() {
        assert!(verify_password("password", "not-a-phc-string").is_err());
    }
}
