use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Fill `len` bytes from the system CSPRNG and return them as lowercase hex.
pub(crate) fn gen_random_hex(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_hex_length() {
        let value = gen_random_hex(32).expect("randomness source should be available");
        assert_eq!(value.len(), 64);
    }

    #[test]
    fn test_gen_random_hex_charset() {
        let value = gen_random_hex(32).expect("randomness source should be available");
        assert!(value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_gen_random_hex_distinct() {
        let a = gen_random_hex(32).expect("randomness source should be available");
        let b = gen_random_hex(32).expect("randomness source should be available");
        assert_ne!(a, b);
    }
}
