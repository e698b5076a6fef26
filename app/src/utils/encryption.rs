use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

const NONCE_SIZE: usize = 12;

/// Seal a secret (posting-provider profile keys) with AES-256-GCM.
/// Output is base64(nonce || ciphertext).
pub fn seal(plaintext: &str, key: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(&derive_key(key))
        .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| anyhow!("Encryption failed: {}", e))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(sealed))
}

/// Open a value produced by [`seal`].
pub fn open(sealed: &str, key: &str) -> Result<String> {
    let bytes = BASE64
        .decode(sealed)
        .map_err(|e| anyhow!("Failed to decode sealed value: {}", e))?;

    if bytes.len() <= NONCE_SIZE {
        return Err(anyhow!("Sealed value too short"));
    }

    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new_from_slice(&derive_key(key))
        .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| anyhow!("Decryption failed: {}", e))?;

    String::from_utf8(plaintext).map_err(|e| anyhow!("Sealed value was not UTF-8: {}", e))
}

/// Derive the 32-byte cipher key as SHA-256 of the configured key string.
fn derive_key(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = "master-key-for-tests";
        let plaintext = "PROFILE-9F3K-1XQ2-77AB";

        let sealed = seal(plaintext, key).unwrap();
        assert_ne!(sealed, plaintext);

        let opened = open(&sealed, key).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal("PROFILE-9F3K", "correct-key").unwrap();
        assert!(open(&sealed, "wrong-key").is_err());
    }

    #[test]
    fn test_garbage_input_fails() {
        assert!(open("not base64 at all!", "key").is_err());
        assert!(open("", "key").is_err());
    }
}
