// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signer loading for the DataLogger write path.
//!
//! Keys come either as a hex string or as a PEM file holding a PKCS#8 or
//! SEC1 secp256k1 key.

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;

use super::client::{ChainClient, ChainClientError};

/// Parse a private key from PEM format to hex string.
///
/// # Returns
/// * `Ok(String)` - Hex-encoded private key (64 characters, no 0x prefix)
/// * `Err(ChainClientError)` - If PEM parsing fails
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, ChainClientError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .map_err(|e| e.to_string())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Create a signer from PEM-encoded private key bytes.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, ChainClientError> {
    let hex_key = pem_to_hex(pem_bytes)?;
    ChainClient::create_signer(&hex_key)
}

/// Create a signer from a PEM file on disk.
pub fn signer_from_pem_file(path: &Path) -> Result<PrivateKeySigner, ChainClientError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ChainClientError::InvalidPrivateKey(format!("Cannot read {}: {}", path.display(), e))
    })?;
    signer_from_pem(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::pkcs8::{EncodePrivateKey, LineEnding};
    use std::io::Write;

    fn test_secret() -> SecretKey {
        SecretKey::from_slice(&[7u8; 32]).unwrap()
    }

    #[test]
    fn test_pkcs8_pem_to_hex() {
        let pem = test_secret().to_pkcs8_pem(LineEnding::LF).unwrap();
        let hex = pem_to_hex(pem.as_bytes()).unwrap();
        assert_eq!(hex, "07".repeat(32));
    }

    #[test]
    fn test_sec1_pem_to_hex() {
        let pem = test_secret().to_sec1_pem(LineEnding::LF).unwrap();
        let hex = pem_to_hex(pem.as_bytes()).unwrap();
        assert_eq!(hex.len(), 64, "Hex key should be 64 characters");
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()), "Should be valid hex");
    }

    #[test]
    fn test_signer_from_pem_file() {
        let pem = test_secret().to_pkcs8_pem(LineEnding::LF).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(pem.as_bytes()).unwrap();

        let from_file = signer_from_pem_file(file.path()).unwrap();
        let from_hex = ChainClient::create_signer(&"07".repeat(32)).unwrap();
        assert_eq!(from_file.address(), from_hex.address());
    }

    #[test]
    fn test_garbage_pem_is_rejected() {
        assert!(matches!(
            pem_to_hex(b"not a pem"),
            Err(ChainClientError::InvalidPrivateKey(_))
        ));
        assert!(signer_from_pem_file(Path::new("/nonexistent/key.pem")).is_err());
    }
}
