//! Credential model (identity documents).
//!
//! # Invariants
//! - Encoded form is `KIND:NUMBER`, e.g. `PASSPORT:X1234567`.
//! - Normalized numbers are uppercase ASCII alphanumerics without separators.

use crate::model::capability::Normalize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static CREDENTIAL_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z0-9]{4,32}$").expect("credential number pattern must compile")
});

/// Model-level parse/validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownCredentialKind(String),
    MalformedCredential(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCredentialKind(kind) => write!(f, "unknown credential kind: {kind}"),
            Self::MalformedCredential(value) => write!(f, "malformed credential: {value}"),
        }
    }
}

impl Error for ModelError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    #[serde(rename = "ID_CARD")]
    IdentityCard,
    #[serde(rename = "PASSPORT")]
    Passport,
    #[serde(rename = "DRIVER_LICENSE")]
    DriverLicense,
}

impl CredentialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdentityCard => "ID_CARD",
            Self::Passport => "PASSPORT",
            Self::DriverLicense => "DRIVER_LICENSE",
        }
    }

    fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ID_CARD" => Ok(Self::IdentityCard),
            "PASSPORT" => Ok(Self::Passport),
            "DRIVER_LICENSE" => Ok(Self::DriverLicense),
            other => Err(ModelError::UnknownCredentialKind(other.to_string())),
        }
    }
}

/// Identity document used as an optional alternate key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    pub kind: CredentialKind,
    pub number: String,
}

impl Credential {
    pub fn new(kind: CredentialKind, number: impl Into<String>) -> Self {
        Self {
            kind,
            number: number.into(),
        }
    }

    /// Parses the encoded `KIND:NUMBER` form and normalizes the number.
    ///
    /// # Errors
    /// - `UnknownCredentialKind` when the prefix is not a known kind.
    /// - `MalformedCredential` when the separator is missing or the number
    ///   does not match the accepted pattern after normalization.
    pub fn parse(encoded: &str) -> Result<Self, ModelError> {
        let (kind, number) = encoded
            .split_once(':')
            .ok_or_else(|| ModelError::MalformedCredential(encoded.to_string()))?;
        let mut credential = Self::new(CredentialKind::parse(kind)?, number);
        credential.normalize();
        credential.validate()?;
        Ok(credential)
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.number)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if CREDENTIAL_NUMBER_PATTERN.is_match(&self.number) {
            Ok(())
        } else {
            Err(ModelError::MalformedCredential(self.encode()))
        }
    }
}

impl Normalize for Credential {
    fn normalize(&mut self) {
        self.number = self
            .number
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '-')
            .flat_map(char::to_uppercase)
            .collect();
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}
