//! LCP licenses.
//!
//! A license goes through two phases. Decoding JSON gives a
//! [`License<Parsed>`], which is inert: it describes rights and keys but
//! can't be attached to a publication. [`activate()`](License::activate)
//! consumes it and records where the license came from and the exact text
//! it was decoded from, giving a [`License<Active>`] ready for the decryption
//! layer. Only active licenses can be attached to a
//! [`Publication`](crate::Publication).

mod document;
mod validate;

pub use self::document::{ContentKey, Encryption, LicenseDocument, LicenseLink, Rights, Signature, User, UserKey};
pub use self::validate::is_well_formed;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::Value;

mod sealed {
    pub trait Sealed {}
}
pub trait LicenseState: sealed::Sealed {
    type Activation: std::fmt::Debug + Clone + PartialEq;
}

/// Decoded but not yet activated.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed;
impl sealed::Sealed for Parsed {}
impl LicenseState for Parsed {
    type Activation = ();
}

/// Activated and attachable to a publication.
#[derive(Debug, Clone, PartialEq)]
pub struct Active;
impl sealed::Sealed for Active {}
impl LicenseState for Active {
    type Activation = Activation;
}

/// What activation records about a license.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Path of the license relative to the package it came from, or a
    /// placeholder for licenses that never lived inside an archive.
    pub origin: String,
    /// The exact JSON text the license was decoded from, when known.
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct License<S: LicenseState = Parsed> {
    document: LicenseDocument,
    activation: S::Activation,
}

impl<S: LicenseState> License<S> {
    pub fn document(&self) -> &LicenseDocument {
        &self.document
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }
}

impl License<Parsed> {
    /// Decodes and checks a license payload.
    ///
    /// # Errors
    /// - [`InvalidLicense`](ErrorKind::InvalidLicense) if the payload isn't
    ///   JSON or doesn't decode into a [`LicenseDocument`].
    /// - [`MalformedLicense`](ErrorKind::MalformedLicense) if it is JSON but
    ///   fails [`is_well_formed()`].
    pub fn parse(payload: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(payload).or_raise(|| ErrorKind::InvalidLicense)?;
        if !is_well_formed(&json) {
            exn::bail!(ErrorKind::MalformedLicense);
        }
        let document: LicenseDocument = serde_json::from_value(json).or_raise(|| ErrorKind::InvalidLicense)?;
        Ok(Self::from(document))
    }

    /// Consumes the parsed license, recording its origin and source text.
    pub fn activate(self, origin: impl Into<String>, source: Option<String>) -> License<Active> {
        License {
            document: self.document,
            activation: Activation { origin: origin.into(), source },
        }
    }
}
impl From<LicenseDocument> for License<Parsed> {
    fn from(document: LicenseDocument) -> Self {
        Self { document, activation: () }
    }
}

impl License<Active> {
    pub fn origin(&self) -> &str {
        &self.activation.origin
    }

    pub fn source(&self) -> Option<&str> {
        self.activation.source.as_deref()
    }

    /// The JSON text to persist for this license.
    ///
    /// The original source text is preferred so that the signature still
    /// matches byte for byte; otherwise the document is re-serialized.
    pub fn to_json(&self) -> Result<String> {
        match &self.activation.source {
            Some(source) => Ok(source.clone()),
            None => serde_json::to_string(&self.document).or_raise(|| ErrorKind::Serialize("license")),
        }
    }
}
