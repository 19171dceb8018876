//! Random string generation for random-string columns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Character set a random string is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    Alphanumeric,
    Alpha,
    Numeric,
    Hexadecimal,
}

impl Charset {
    pub fn all() -> &'static [Charset] {
        &[
            Charset::Alphanumeric,
            Charset::Alpha,
            Charset::Numeric,
            Charset::Hexadecimal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Charset::Alphanumeric => "alphanumeric",
            Charset::Alpha => "alpha",
            Charset::Numeric => "numeric",
            Charset::Hexadecimal => "hexadecimal",
        }
    }

    /// Characters of the set. The alpha sets leave out `l`, `O`, `0` and `1`
    /// so generated strings can be read back without ambiguity.
    pub fn alphabet(&self) -> &'static [u8] {
        match self {
            Charset::Alphanumeric => {
                b"abcdefghijkmnopqrstuvwxyzABCDEFGHIJKLMNPQRSTUVWXYZ23456789"
            }
            Charset::Alpha => b"abcdefghijkmnopqrstuvwxyzABCDEFGHIJKLMNPQRSTUVWXYZ",
            Charset::Numeric => b"0123456789",
            Charset::Hexadecimal => b"abcdef0123456789",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigurationError::InvalidCharset {
                charset: s.to_string(),
                allowed: Charset::all()
                    .iter()
                    .map(Charset::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Generator of random strings
pub trait RandomSource: Send + Sync {
    fn generate(&self, length: usize, charset: Charset) -> String;
}

/// Random source backed by the thread-local RNG
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn generate(&self, length: usize, charset: Charset) -> String {
        let alphabet = charset.alphabet();
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect()
    }
}
