//! Deterministic call-argument fingerprints
//!
//! Positional arguments are stringified in call order, keyword arguments as
//! `key=value` sorted by key; the parts are joined with `:` and hashed with
//! SHA-256. The hex digest is the memoization key inside a namespace.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Hex-encoded SHA-256 digest of a call's arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digest(parts: &[String]) -> Self {
        let joined = parts.join(":");
        Self(hex::encode(Sha256::digest(joined.as_bytes())))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stringified arguments of one call
///
/// ```
/// use underwrite_cache::cache::CallArgs;
///
/// let a = CallArgs::new().arg(42).kwarg("include_docs", true).kwarg("page", 2);
/// let b = CallArgs::new().arg(42).kwarg("page", 2).kwarg("include_docs", true);
/// assert_eq!(a.fingerprint(), b.fingerprint());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    positional: Vec<String>,
    keyword: BTreeMap<String, String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Set a keyword argument; a repeated name keeps the last value
    pub fn kwarg(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.keyword.insert(name.into(), value.to_string());
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let parts: Vec<String> = self
            .positional
            .iter()
            .cloned()
            .chain(
                self.keyword
                    .iter()
                    .map(|(name, value)| format!("{name}={value}")),
            )
            .collect();
        Fingerprint::digest(&parts)
    }
}

/// Arguments that can be reduced to a [`Fingerprint`]
///
/// Implemented for [`CallArgs`] and for tuples of up to six `Display` values,
/// which are treated as positional arguments. Single arguments are passed as
/// one-element tuples: `(deal_id,)`.
pub trait FingerprintArgs {
    fn fingerprint(&self) -> Fingerprint;
}

impl FingerprintArgs for CallArgs {
    fn fingerprint(&self) -> Fingerprint {
        CallArgs::fingerprint(self)
    }
}

impl FingerprintArgs for () {
    fn fingerprint(&self) -> Fingerprint {
        CallArgs::new().fingerprint()
    }
}

macro_rules! impl_fingerprint_args_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: fmt::Display),+> FingerprintArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn fingerprint(&self) -> Fingerprint {
                let ($($name,)+) = self;
                CallArgs::new()$(.arg($name))+.fingerprint()
            }
        }
    };
}

impl_fingerprint_args_for_tuple!(A);
impl_fingerprint_args_for_tuple!(A, B);
impl_fingerprint_args_for_tuple!(A, B, C);
impl_fingerprint_args_for_tuple!(A, B, C, D);
impl_fingerprint_args_for_tuple!(A, B, C, D, E);
impl_fingerprint_args_for_tuple!(A, B, C, D, E, F);
