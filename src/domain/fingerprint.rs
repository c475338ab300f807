use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::domain::extraction_options::ExtractionOptions;
use crate::domain::mime::MimeKind;

/// Content-addressed identity of one extraction request: document bytes,
/// declared media type, and the result-affecting options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(bytes: &[u8], mime: MimeKind, options: &ExtractionOptions) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher.update(mime.as_mime().as_bytes());
        hasher.update(options.cache_key_fragment().as_bytes());
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
