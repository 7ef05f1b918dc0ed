//! Composite identifiers
//!
//! Every state record carries an `id` built from its natural key, e.g.
//! `acme:web` for a project or `acme:web:42` for a pipeline. Components
//! never contain the separator; the domain and slug validators rule it out.
//! Empty components are allowed and survive a round trip.

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

pub const SEPARATOR: char = ':';

const UNIQUE_PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid id \"{id}\": expected {expected} components separated by ':'")]
    Malformed { id: String, expected: usize },
}

/// `a:b`
pub fn compose_double(a: &str, b: &str) -> String {
    format!("{a}{SEPARATOR}{b}")
}

/// `a:b:c`
pub fn compose_triple(a: &str, b: &str, c: &str) -> String {
    format!("{a}{SEPARATOR}{b}{SEPARATOR}{c}")
}

fn split(id: &str, expected: usize) -> Result<Vec<&str>, IdError> {
    let parts: Vec<&str> = id.split(SEPARATOR).collect();
    if parts.len() != expected {
        return Err(IdError::Malformed {
            id: id.to_string(),
            expected,
        });
    }
    Ok(parts)
}

pub fn decompose_double(id: &str) -> Result<(String, String), IdError> {
    let parts = split(id, 2)?;
    Ok((parts[0].to_string(), parts[1].to_string()))
}

pub fn decompose_triple(id: &str) -> Result<(String, String, String), IdError> {
    let parts = split(id, 3)?;
    Ok((parts[0].to_string(), parts[1].to_string(), parts[2].to_string()))
}

/// Synthetic id for list data sources: five random lowercase letters
/// followed by the current time in nanoseconds.
pub fn unique_string() -> String {
    let mut rng = rand::thread_rng();
    let prefix: String = (0..UNIQUE_PREFIX_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1_000);
    format!("{prefix}{nanos}")
}
