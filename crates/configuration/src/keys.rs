use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generates a fresh API credential: random bytes from the OS CSPRNG, hashed
/// and hex-encoded, truncated to `length` characters.
pub fn new_api_token(length: usize) -> String {
    let mut seed = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    let digest = Sha256::digest(seed);
    let mut token = hex::encode(digest);
    token.truncate(length);
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_have_the_requested_length() {
        assert_eq!(new_api_token(9).len(), 9);
        assert_eq!(new_api_token(16).len(), 16);
    }

    #[test]
    fn tokens_are_unique() {
        let a = new_api_token(16);
        let b = new_api_token(16);
        assert_ne!(a, b);
    }
}
