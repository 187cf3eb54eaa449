//! # Authentication Primitives
//!
//! Password hashing and account credential policy:
//! - Argon2id hashing with PHC-style encoded output
//! - Constant-time verification
//! - Password strength validation for registration and password changes

pub mod password;

pub use password::{hash_password, validate_password_strength, verify_password, PasswordConfig};
pub use secrecy;
pub use subtle;

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};

    use super::password::{hash_password, validate_password_strength, verify_password};

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("buttered-crumpets-42".to_string());
        let hash = hash_password(&password, None).unwrap();
        let result = verify_password(&password, hash.expose_secret());
        assert!(result.is_ok(), "Verification failed: {:?}", result);
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword".to_string());
        let wrong_password = SecretString::from("WrongPassword".to_string());
        let hash = hash_password(&password, None).unwrap();
        assert!(verify_password(&wrong_password, hash.expose_secret()).is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password_strength("abc", None).is_err());
        assert!(validate_password_strength("plenty-good-enough", None).is_ok());
    }
}
