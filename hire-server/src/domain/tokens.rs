//! Session token types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of encoding characters shown by [`TokenSet::encoding_preview`].
const PREVIEW_CHARS: usize = 15;

/// Error returned when parsing an invalid client time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid client time: {reason}")]
pub struct InvalidClientTime {
    reason: &'static str,
}

/// The client clock reading that accompanies an encoding.
///
/// The workflow API expects a fractional Unix timestamp rendered as text,
/// e.g. `"1748480905.359684"`. The value is kept verbatim so that a captured
/// time is replayed byte-for-byte.
///
/// # Examples
///
/// ```
/// use hire_server::domain::ClientTime;
///
/// let time = ClientTime::parse("1748480905.359684").unwrap();
/// assert_eq!(time.as_str(), "1748480905.359684");
///
/// // Whole seconds are accepted
/// assert!(ClientTime::parse("1748480905").is_ok());
///
/// // Anything else is rejected
/// assert!(ClientTime::parse("").is_err());
/// assert!(ClientTime::parse("12:30").is_err());
/// assert!(ClientTime::parse("1748480905.").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientTime(String);

impl ClientTime {
    /// Parse a client time of the form `<digits>[.<digits>]`.
    pub fn parse(s: &str) -> Result<Self, InvalidClientTime> {
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (s, None),
        };

        if whole.is_empty() {
            return Err(InvalidClientTime {
                reason: "missing whole seconds",
            });
        }

        if !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidClientTime {
                reason: "seconds must be ASCII digits",
            });
        }

        if let Some(fraction) = fraction
            && (fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(InvalidClientTime {
                reason: "fraction must be one or more ASCII digits",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Render an instant the way the mobile client does: seconds and
    /// microseconds, always six fractional digits.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(format!(
            "{}.{:06}",
            instant.timestamp(),
            instant.timestamp_subsec_micros().min(999_999)
        ))
    }

    /// Returns the client time as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientTime {
    type Error = InvalidClientTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClientTime> for String {
    fn from(time: ClientTime) -> Self {
        time.0
    }
}

impl fmt::Debug for ClientTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientTime({})", self.0)
    }
}

impl fmt::Display for ClientTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An encoding/client-time pair accepted by the workflow API as session
/// proof, plus a label recording where it came from.
///
/// Token sets are never mutated; a refreshed or relabelled pairing is a new
/// value.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    encoding: String,
    client_time: ClientTime,
    source: String,
}

impl TokenSet {
    /// Create a new token set.
    pub fn new(
        encoding: impl Into<String>,
        client_time: ClientTime,
        source: impl Into<String>,
    ) -> Self {
        Self {
            encoding: encoding.into(),
            client_time,
            source: source.into(),
        }
    }

    /// The opaque `c3-encoding` value.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// The client time sent alongside the encoding.
    pub fn client_time(&self) -> &ClientTime {
        &self.client_time
    }

    /// Provenance label.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The same pairing under a different provenance label.
    pub fn relabel(&self, source: impl Into<String>) -> Self {
        Self::new(self.encoding.clone(), self.client_time.clone(), source)
    }

    /// Leading characters of the encoding, for logs and status displays.
    pub fn encoding_preview(&self) -> String {
        preview(&self.encoding)
    }
}

/// Truncate an encoding for display.
pub fn preview(encoding: &str) -> String {
    let mut chars = encoding.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("encoding", &self.encoding_preview())
            .field("client_time", &self.client_time)
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_valid_client_times() {
        assert!(ClientTime::parse("1748480905.359684").is_ok());
        assert!(ClientTime::parse("1748480905").is_ok());
        assert!(ClientTime::parse("0.1").is_ok());
    }

    #[test]
    fn reject_malformed_client_times() {
        assert!(ClientTime::parse("").is_err());
        assert!(ClientTime::parse(".5").is_err());
        assert!(ClientTime::parse("17484809a5").is_err());
        assert!(ClientTime::parse("1748480905.").is_err());
        assert!(ClientTime::parse("1748480905.35.96").is_err());
        assert!(ClientTime::parse("-1748480905").is_err());
        assert!(ClientTime::parse(" 1748480905").is_err());
    }

    #[test]
    fn client_time_at_renders_six_fraction_digits() {
        let instant = Utc.timestamp_opt(1_748_480_905, 359_684_000).unwrap();
        assert_eq!(ClientTime::at(instant).as_str(), "1748480905.359684");

        let whole = Utc.timestamp_opt(1_748_480_905, 0).unwrap();
        assert_eq!(ClientTime::at(whole).as_str(), "1748480905.000000");

        let small = Utc.timestamp_opt(1_748_480_905, 42_000).unwrap();
        assert_eq!(ClientTime::at(small).as_str(), "1748480905.000042");
    }

    #[test]
    fn rendered_client_time_parses() {
        let instant = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let rendered = ClientTime::at(instant);
        assert_eq!(ClientTime::parse(rendered.as_str()), Ok(rendered));
    }

    #[test]
    fn serde_rejects_invalid_client_time() {
        let ok: Result<ClientTime, _> = serde_json::from_str("\"1748480905.5\"");
        assert!(ok.is_ok());

        let bad: Result<ClientTime, _> = serde_json::from_str("\"yesterday\"");
        assert!(bad.is_err());
    }

    #[test]
    fn relabel_keeps_pairing() {
        let time = ClientTime::parse("1748480905.359684").unwrap();
        let tokens = TokenSet::new("abc", time.clone(), "first");
        let relabelled = tokens.relabel("second");

        assert_eq!(relabelled.encoding(), "abc");
        assert_eq!(relabelled.client_time(), &time);
        assert_eq!(relabelled.source(), "second");
        assert_eq!(tokens.source(), "first");
    }

    #[test]
    fn preview_truncates_long_encodings() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("exactly15chars!"), "exactly15chars!");
        assert_eq!(
            preview("Kv6OJKA1JWRui1R+UltG2iCZBcb3"),
            "Kv6OJKA1JWRui1R..."
        );
    }

    #[test]
    fn debug_hides_full_encoding() {
        let tokens = TokenSet::new(
            "Kv6OJKA1JWRui1R+UltG2iCZBcb3+EMMfBu5aAhZNEXnA3QTJHKcKBLT+Hd097N5",
            ClientTime::parse("1").unwrap(),
            "test",
        );
        let debug = format!("{tokens:?}");
        assert!(debug.contains("Kv6OJKA1JWRui1R..."));
        assert!(!debug.contains("Hd097N5"));
    }
}
