//! Ephemeral X25519 key pairs.
//!
//! A [`KeyPair`] is generated for exactly one connection attempt and dropped with it.
//! The private half is zeroized on drop.
//!
//! # Example
//!
//! ```
//! use boxwire_crypto::KeyPair;
//!
//! let alice = KeyPair::generate().unwrap();
//! let bob = KeyPair::generate().unwrap();
//!
//! let alice_side = alice.pairing(bob.public_key()).unwrap();
//! let bob_side = bob.pairing(alice.public_key()).unwrap();
//!
//! let record = alice_side.seal(b"hello").unwrap();
//! assert_eq!(bob_side.open(&record).unwrap(), b"hello");
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::sealed::KeyPairing;
use crate::KEY_LEN;

/// X25519 key pair for one connection.
pub struct KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new key pair from the OS CSPRNG.
    ///
    /// # Errors
    /// Returns [`CryptoError::Randomness`] if the OS cannot supply random bytes.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_from_rng(&mut OsRng)
    }

    /// Generate a new key pair from the given CSPRNG.
    pub fn generate_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut private = Zeroizing::new([0u8; KEY_LEN]);
        rng.try_fill_bytes(&mut private[..])
            .map_err(CryptoError::randomness)?;

        Ok(Self::from_private_bytes(*private))
    }

    /// Rebuild a key pair from raw private key bytes.
    pub fn from_private_bytes(private: [u8; KEY_LEN]) -> Self {
        let secret = StaticSecret::from(private);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The public key, sent to the peer during the handshake.
    pub fn public_key(&self) -> &[u8; KEY_LEN] {
        self.public.as_bytes()
    }

    /// Raw private key bytes. Handle with care.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; KEY_LEN]> {
        Zeroizing::new(self.secret.to_bytes())
    }

    /// Combine this key pair's private key with a peer's public key.
    pub fn pairing(&self, peer_public: &[u8; KEY_LEN]) -> Result<KeyPairing, CryptoError> {
        KeyPairing::from_secret(&self.secret, peer_public)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let public = self.public.as_bytes();
        write!(
            f,
            "KeyPair(public={:02x}{:02x}{:02x}{:02x}..)",
            public[0], public[1], public[2], public[3]
        )
    }
}
