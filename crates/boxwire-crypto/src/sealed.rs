//! Sealing and opening records under a key pairing.
//!
//! A key pairing is one side's private key combined with the other side's public key.
//! The X25519 shared secret is expanded with HKDF-SHA256 into a single XChaCha20-Poly1305
//! key. The derivation does not depend on which side runs it, so the client's pairing
//! and the server's pairing hold the same key.
//!
//! # Record format
//!
//! ```text
//! [24 bytes: nonce] [ciphertext] [16 bytes: tag]
//! ```
//!
//! Opening fails closed: any flipped bit in nonce, ciphertext, or tag yields
//! [`CryptoError::Decryption`] and no plaintext.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::{KEY_LEN, NONCE_LEN, RECORD_OVERHEAD};

const KDF_SALT: &[u8] = b"boxwire-record-salt-v1";
const KDF_INFO: &[u8] = b"boxwire-record-key-v1";

/// Local private key paired with a remote public key.
///
/// Cloning is cheap enough to give the read and write paths their own copy.
#[derive(Clone)]
pub struct KeyPairing {
    cipher: XChaCha20Poly1305,
    peer_public: [u8; KEY_LEN],
}

impl KeyPairing {
    /// Build a pairing from raw private key bytes and the peer's public key.
    pub fn new(
        private_key: &[u8; KEY_LEN],
        peer_public: &[u8; KEY_LEN],
    ) -> Result<Self, CryptoError> {
        let secret = StaticSecret::from(*private_key);
        Self::from_secret(&secret, peer_public)
    }

    pub(crate) fn from_secret(
        secret: &StaticSecret,
        peer_public: &[u8; KEY_LEN],
    ) -> Result<Self, CryptoError> {
        let shared = secret.diffie_hellman(&PublicKey::from(*peer_public));
        if !shared.was_contributory() {
            return Err(CryptoError::WeakPeerKey);
        }

        let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), shared.as_bytes());
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        hk.expand(KDF_INFO, &mut key[..])
            .map_err(|_| CryptoError::KeyDerivation)?;

        Ok(Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(&key[..])),
            peer_public: *peer_public,
        })
    }

    /// The remote public key this pairing was built with.
    pub fn peer_public_key(&self) -> &[u8; KEY_LEN] {
        &self.peer_public
    }

    /// Seal `plaintext` under a fresh random nonce from the OS CSPRNG.
    ///
    /// Returns `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.seal_with_rng(&mut OsRng, plaintext)
    }

    /// Seal `plaintext` under a fresh nonce drawn from `rng`.
    pub fn seal_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        rng.try_fill_bytes(&mut nonce)
            .map_err(CryptoError::randomness)?;

        self.seal_with_nonce(&nonce, plaintext)
    }

    /// Seal `plaintext` under the caller's nonce.
    ///
    /// A nonce must never be used twice with the same pairing.
    pub fn seal_with_nonce(
        &self,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = self
            .cipher
            .encrypt(XNonce::from_slice(nonce), plaintext)
            .map_err(|_| CryptoError::Encryption)?;

        let mut record = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        record.extend_from_slice(nonce);
        record.extend_from_slice(&ciphertext);
        Ok(record)
    }

    /// Authenticate and decrypt a `nonce || ciphertext` record.
    pub fn open(&self, record: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if record.len() < RECORD_OVERHEAD {
            return Err(CryptoError::RecordTooShort {
                len: record.len(),
                min: RECORD_OVERHEAD,
            });
        }

        let (nonce, ciphertext) = record.split_at(NONCE_LEN);
        self.cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decryption)
    }
}
