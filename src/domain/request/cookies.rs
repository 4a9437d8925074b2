use std::collections::BTreeMap;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::domain::{AppError, Signer};

/// Cookies sent with a request.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    values: BTreeMap<String, String>,
    signer: Option<Arc<Signer>>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the signer used by [`Cookies::get_signed`].
    pub fn with_signer(mut self, signer: Arc<Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Value of a signed cookie, or `None` when it is absent or its signature does not match.
    pub fn get_signed(&self, name: &str) -> Result<Option<String>, AppError> {
        let signer = self.signer.as_ref().ok_or(AppError::SignerMissing)?;
        Ok(self.get_signed_with(name, signer))
    }

    /// Like [`Cookies::get_signed`], validating with `signer` instead of the attached one.
    pub fn get_signed_with(&self, name: &str, signer: &Signer) -> Option<String> {
        let raw = self.values.get(name)?;
        let value = signer.validate(raw);
        if value.is_none() {
            tracing::warn!("rejected cookie '{}' with invalid signature", name);
        }
        value
    }

    pub fn get_signed_or(&self, name: &str, default: &str) -> Result<String, AppError> {
        Ok(self.get_signed(name)?.unwrap_or_else(|| default.to_string()))
    }

    /// Parse a `Cookie` request header (`a=1; b=2`). Values are percent-decoded.
    /// Malformed pairs are skipped.
    pub fn parse_header(&mut self, header: &str) {
        for pair in header.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    let value = percent_decode_str(value.trim()).decode_utf8_lossy();
                    self.values.insert(name.to_string(), value.into_owned());
                }
            }
        }
    }
}
