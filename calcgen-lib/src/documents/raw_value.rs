use compact_str::CompactString;
use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Serialize, Serializer};

/// Literals that coerce to `true`, compared case-insensitively.
const TRUE_LITERALS: [&str; 3] = ["true", "yes", "on"];

/// Literals that coerce to `false`, compared case-insensitively.
const FALSE_LITERALS: [&str; 3] = ["false", "no", "off"];

/// A scalar value taken from a document, after type coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(CompactString),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl RawValue {
    /// Returns the string content if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the numeric content of integer and float values.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "document numbers are small enough to be exact")]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns `true` for the empty string.
    ///
    /// Every other value, including `0` and `false`, counts as present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

/// Convert a raw token into a typed value.
///
/// Quoted text is always a string. Otherwise integers win over floats, and boolean
/// literals come last. Floats are only attempted when the text contains a `.`, and a
/// float that overflows to infinity is kept as text. Anything else is returned as the
/// trimmed text. This function never fails.
#[must_use]
pub fn coerce(text: &str) -> RawValue {
    let text = text.trim();

    if let Some(inner) = strip_quotes(text) {
        return RawValue::String(inner.into());
    }

    if let Ok(i) = text.parse::<i64>() {
        return RawValue::Integer(i);
    }

    if text.contains('.')
        && let Ok(f) = text.parse::<f64>()
        && f.is_finite()
    {
        return RawValue::Float(f);
    }

    if TRUE_LITERALS.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        return RawValue::Boolean(true);
    }

    if FALSE_LITERALS.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        return RawValue::Boolean(false);
    }

    RawValue::String(text.into())
}

/// Trim a token and strip one pair of matching quotes, without any type coercion.
#[must_use]
pub fn unquote(text: &str) -> CompactString {
    let text = text.trim();
    strip_quotes(text).unwrap_or(text).into()
}

fn strip_quotes(text: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| text.strip_prefix(quote)?.strip_suffix(quote))
}
