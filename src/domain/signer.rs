//! HMAC-SHA256 signing for cookie values.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::AppError;
use crate::domain::encoding::{from_hex, to_hex};

type HmacSha256 = Hmac<Sha256>;

/// Length of the hex-encoded MAC prefixed to signed values.
pub const MAC_LENGTH: usize = 64;

/// Signs values as `<hex mac><value>` and validates them back.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("secret", &"[REDACTED]").finish()
    }
}

impl Signer {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AppError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AppError::config_error("Signing secret must not be empty"));
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|err| AppError::config_error(format!("Invalid signing secret: {}", err)))?;
        Ok(Self { mac })
    }

    pub fn sign(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        format!("{}{}", to_hex(&mac.finalize().into_bytes()), value)
    }

    /// Return the original value if the signature matches.
    pub fn validate(&self, signed: &str) -> Option<String> {
        let mac_hex = signed.get(..MAC_LENGTH)?;
        let value = signed.get(MAC_LENGTH..)?;
        let expected = from_hex(mac_hex)?;

        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        mac.verify_slice(&expected).ok()?;
        Some(value.to_string())
    }
}
