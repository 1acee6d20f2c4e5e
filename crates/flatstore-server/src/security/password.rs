//! Keyed password digests

use std::fmt::{self, Write as _};

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 password digests, hex encoded
///
/// Stored user records only ever hold the output of [`PasswordHasher::digest`].
#[derive(Clone)]
pub struct PasswordHasher {
    mac: HmacSha256,
}

impl PasswordHasher {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    /// Hex digest of `password`
    pub fn digest(&self, password: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        let bytes = mac.finalize().into_bytes();

        let mut hex = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }

    /// Compare `password` against a stored digest in constant time
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let computed = self.digest(password);
        computed.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let hasher = PasswordHasher::new(b"secret").unwrap();
        let first = hasher.digest("hunter2");

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(first, hasher.digest("hunter2"));
        assert_ne!(first, hasher.digest("hunter3"));
    }

    #[test]
    fn test_digest_depends_on_secret() {
        let a = PasswordHasher::new(b"one").unwrap();
        let b = PasswordHasher::new(b"two").unwrap();
        assert_ne!(a.digest("pw"), b.digest("pw"));
    }

    #[test]
    fn test_verify() {
        let hasher = PasswordHasher::new(b"secret").unwrap();
        let stored = hasher.digest("pw");

        assert!(hasher.verify("pw", &stored));
        assert!(!hasher.verify("other", &stored));
        assert!(!hasher.verify("pw", "pw"));
        assert!(!hasher.verify("pw", ""));
    }

    #[test]
    fn test_debug_hides_key() {
        let hasher = PasswordHasher::new(b"secret").unwrap();
        assert_eq!(format!("{hasher:?}"), "PasswordHasher { .. }");
    }
}
