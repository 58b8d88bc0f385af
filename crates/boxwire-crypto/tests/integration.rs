//! Integration tests for key pairs and sealed records.

use boxwire_crypto::{CryptoError, KeyPair, KeyPairing, NONCE_LEN, RECORD_OVERHEAD};

/// Test a full exchange where each side only sees the other's public key bytes
#[test]
fn test_pairing_from_exchanged_public_keys() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();

    // What each side learns over the wire
    let client_pub_on_wire: [u8; 32] = *client.public_key();
    let server_pub_on_wire: [u8; 32] = *server.public_key();

    let client_side = client.pairing(&server_pub_on_wire).unwrap();
    let server_side = server.pairing(&client_pub_on_wire).unwrap();

    let record = server_side.seal(b"hello").unwrap();
    assert_eq!(client_side.open(&record).unwrap(), b"hello");

    let record = client_side.seal(b"hello").unwrap();
    assert_eq!(server_side.open(&record).unwrap(), b"hello");
}

/// Test a 32 KiB plaintext, the largest a single record carries
#[test]
fn test_large_plaintext_roundtrip() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();
    let client_side = client.pairing(server.public_key()).unwrap();
    let server_side = server.pairing(client.public_key()).unwrap();

    let plaintext: Vec<u8> = (0..32 * 1024).map(|i| (i % 251) as u8).collect();
    let record = client_side.seal(&plaintext).unwrap();

    assert_eq!(record.len(), plaintext.len() + RECORD_OVERHEAD);
    assert_eq!(server_side.open(&record).unwrap(), plaintext);
}

/// Test that a pairing with the wrong private key cannot open records
#[test]
fn test_wrong_private_key() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();
    let impostor = KeyPair::generate().unwrap();

    let record = client
        .pairing(server.public_key())
        .unwrap()
        .seal(b"secret")
        .unwrap();

    // Right peer public key, wrong private key
    let wrong = impostor.pairing(client.public_key()).unwrap();
    assert!(matches!(wrong.open(&record), Err(CryptoError::Decryption)));
}

/// Test that a pairing with the wrong public key cannot open records
#[test]
fn test_wrong_public_key() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();
    let impostor = KeyPair::generate().unwrap();

    let record = client
        .pairing(server.public_key())
        .unwrap()
        .seal(b"secret")
        .unwrap();

    // Right private key, wrong peer public key
    let wrong = server.pairing(impostor.public_key()).unwrap();
    assert!(matches!(wrong.open(&record), Err(CryptoError::Decryption)));
}

/// Test that repeated seals never reuse a nonce
#[test]
fn test_nonces_distinct_across_many_seals() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();
    let pairing = client.pairing(server.public_key()).unwrap();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..1000 {
        let record = pairing.seal(b"same").unwrap();
        let nonce: [u8; NONCE_LEN] = record[..NONCE_LEN].try_into().unwrap();
        assert!(seen.insert(nonce), "nonce reused");
    }
}

/// Test that raw private bytes build the same pairing as the key pair itself
#[test]
fn test_pairing_from_raw_bytes() {
    let client = KeyPair::generate().unwrap();
    let server = KeyPair::generate().unwrap();

    let raw = KeyPairing::new(&client.private_key_bytes(), server.public_key()).unwrap();
    let record = raw.seal(b"raw").unwrap();

    let server_side = server.pairing(client.public_key()).unwrap();
    assert_eq!(server_side.open(&record).unwrap(), b"raw");
}
