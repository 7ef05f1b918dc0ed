//! Attribute validators
//!
//! Reusable checks attached to schema attributes. They only ever see
//! known values; null and unknown configuration is skipped by the schema.

use crate::framework::diag::{AttrPath, Diagnostic, Diagnostics};
use crate::framework::value::StateValue;
use regex::Regex;
use std::sync::OnceLock;

/// Workspace handle: lowercase alnum, `-` and `_`, alnum at both ends
const DOMAIN_PATTERN: &str = r"^[a-z0-9][a-z0-9\-_]+[a-z0-9]$";
const DOMAIN_MIN_LENGTH: usize = 4;
const DOMAIN_MAX_LENGTH: usize = 100;

const EMAIL_PATTERN: &str = r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?)+$";

const SLUG_PATTERN: &str = r"^[a-z0-9](?:[a-z0-9\-_]*[a-z0-9])?$";

static DOMAIN_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid built-in pattern {}: {}", pattern, e))
    })
}

/// Check a workspace domain handle
pub fn is_valid_domain(domain: &str) -> bool {
    (DOMAIN_MIN_LENGTH..=DOMAIN_MAX_LENGTH).contains(&domain.len())
        && cached(&DOMAIN_RE, DOMAIN_PATTERN).is_match(domain)
}

/// Check an e-mail address (case-insensitive)
pub fn is_valid_email(email: &str) -> bool {
    cached(&EMAIL_RE, EMAIL_PATTERN).is_match(email)
}

/// Check a URL slug such as a project name
pub fn is_valid_slug(slug: &str) -> bool {
    cached(&SLUG_RE, SLUG_PATTERN).is_match(slug)
}

/// Compile a user-supplied regular expression
pub fn compile_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// A validator attached to a schema attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Workspace domain handle
    Domain,
    /// E-mail address
    Email,
    /// URL slug
    Slug,
    /// Well-formed regular expression
    Regex,
    /// Exact membership in a closed set
    OneOf(&'static [&'static str]),
    /// Integer lower bound, inclusive
    AtLeast(i64),
}

impl Validator {
    /// Run the validator against a known value, appending failures
    pub fn validate(&self, path: &AttrPath, value: &StateValue, diags: &mut Diagnostics) {
        match value {
            StateValue::String(s) => self.validate_str(path, s, diags),
            StateValue::Int64(n) => self.validate_int(path, *n, diags),
            StateValue::Set(items) => {
                for item in items {
                    self.validate(path, item, diags);
                }
            }
            _ => {}
        }
    }

    fn validate_str(&self, path: &AttrPath, value: &str, diags: &mut Diagnostics) {
        let failure = match self {
            Validator::Domain if !is_valid_domain(value) => Some(format!(
                "Attribute {} must be a workspace domain ({}-{} characters, lowercase letters, digits, '-' or '_', starting and ending with a letter or digit), got: \"{}\"",
                path, DOMAIN_MIN_LENGTH, DOMAIN_MAX_LENGTH, value
            )),
            Validator::Email if !is_valid_email(value) => {
                Some(format!("Attribute {} must be a valid email address, got: \"{}\"", path, value))
            }
            Validator::Slug if !is_valid_slug(value) => Some(format!(
                "Attribute {} must contain only lowercase letters, digits, '-' or '_', got: \"{}\"",
                path, value
            )),
            Validator::Regex => match compile_regex(value) {
                Ok(_) => None,
                Err(e) => Some(format!("Attribute {} must be a valid regular expression: {}", path, e)),
            },
            Validator::OneOf(allowed) if !allowed.contains(&value) => Some(format!(
                "Attribute {} value must be one of: [{}], got: \"{}\"",
                path,
                allowed
                    .iter()
                    .map(|a| format!("\"{}\"", a))
                    .collect::<Vec<_>>()
                    .join(" "),
                value
            )),
            _ => None,
        };
        if let Some(detail) = failure {
            diags.push(Diagnostic::attribute(path.clone(), "Invalid Attribute Value", detail));
        }
    }

    fn validate_int(&self, path: &AttrPath, value: i64, diags: &mut Diagnostics) {
        if let Validator::AtLeast(min) = self {
            if value < *min {
                diags.push(Diagnostic::attribute(
                    path.clone(),
                    "Invalid Attribute Value",
                    format!("Attribute {} value must be at least {}, got: {}", path, min, value),
                ));
            }
        }
    }

    /// Human-readable description, used in schema dumps
    pub fn describe(&self) -> String {
        match self {
            Validator::Domain => "workspace domain".to_string(),
            Validator::Email => "email address".to_string(),
            Validator::Slug => "slug".to_string(),
            Validator::Regex => "regular expression".to_string(),
            Validator::OneOf(allowed) => format!("one of: {}", allowed.join(", ")),
            Validator::AtLeast(min) => format!("at least {}", min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: Validator, value: StateValue) -> Diagnostics {
        let mut diags = Diagnostics::new();
        validator.validate(&AttrPath::root("attr"), &value, &mut diags);
        diags
    }

    #[test]
    fn test_domain_rules() {
        assert!(is_valid_domain("acme"));
        assert!(is_valid_domain("my-work_space1"));
        assert!(!is_valid_domain("abc"));
        assert!(!is_valid_domain("-acme"));
        assert!(!is_valid_domain("acme_"));
        assert!(!is_valid_domain("Acme"));
        assert!(!is_valid_domain(&"a".repeat(101)));
        assert!(is_valid_domain(&"a".repeat(100)));
    }

    #[test]
    fn test_email_is_case_insensitive() {
        assert!(is_valid_email("Jane.Doe@Example.COM"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("no-at-sign.example.com"));
    }

    #[test]
    fn test_slug() {
        assert!(is_valid_slug("web"));
        assert!(is_valid_slug("web-app_2"));
        assert!(!is_valid_slug("Web"));
        assert!(!is_valid_slug("web:app"));
    }

    #[test]
    fn test_regex_validator_reports_path() {
        let diags = run(Validator::Regex, StateValue::String("^(read".into()));
        let diag = diags.first_error().unwrap();
        assert_eq!(diag.path, Some(AttrPath::root("attr")));

        assert!(!run(Validator::Regex, StateValue::String("^read".into())).has_error());
    }

    #[test]
    fn test_one_of_is_exact() {
        const STATUS: &[&str] = &["ACTIVE", "CLOSED"];
        assert!(!run(Validator::OneOf(STATUS), StateValue::String("ACTIVE".into())).has_error());
        assert!(run(Validator::OneOf(STATUS), StateValue::String("active".into())).has_error());
    }

    #[test]
    fn test_at_least() {
        assert!(run(Validator::AtLeast(1), StateValue::Int64(0)).has_error());
        assert!(!run(Validator::AtLeast(1), StateValue::Int64(1)).has_error());
    }
}
