//! In-memory form of the runtime properties.

use super::keys;

/// Ordered key/value pairs loaded from a runtime properties file.
///
/// Keys keep the position they were first seen at. Setting an existing key
/// replaces its value in place; setting a new key appends it.
///
/// # Examples
///
/// ```
/// use standalone::properties::{keys, ConfigRecord};
///
/// let mut record = ConfigRecord::parse("connection.password=test\ntomcatport=8081\n");
/// assert_eq!(record.password(), Some("test"));
///
/// assert!(!record.set(keys::TOMCAT_PORT, "8081"));
/// assert!(record.set(keys::TOMCAT_PORT, "8082"));
/// assert_eq!(record.tomcat_port(), Some("8082"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    entries: Vec<(String, String)>,
}

impl ConfigRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of a properties file.
    ///
    /// Follows the `java.util.Properties` text format:
    ///
    /// - blank lines and lines starting with `#` or `!` are skipped
    /// - a line ending in an odd number of backslashes continues on the next
    ///   line, whose leading whitespace is dropped
    /// - the key runs up to the first unescaped `=`, `:` or whitespace, and
    ///   whitespace around the separator is dropped
    /// - `\t`, `\n`, `\r`, `\f` and `\uXXXX` are decoded in keys and values,
    ///   and a backslash before any other character yields that character
    ///
    /// When a key repeats, the last value wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use standalone::properties::ConfigRecord;
    ///
    /// let record = ConfigRecord::parse(
    ///     "connection.url=jdbc\\:mysql\\://localhost\\:3306/openmrs?autoReconnect\\=true\n",
    /// );
    /// assert_eq!(
    ///     record.connection_url(),
    ///     Some("jdbc:mysql://localhost:3306/openmrs?autoReconnect=true")
    /// );
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut record = Self::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            record.set(key, value);
        }
        record
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Store `value` under `key`.
    ///
    /// Returns `true` if the record changed, i.e. the key was absent or held
    /// a different value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) if *existing == value => false,
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.entries.push((key, value));
                true
            }
        }
    }

    /// Database user name.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.get(keys::CONNECTION_USERNAME)
    }

    /// Database password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.get(keys::CONNECTION_PASSWORD)
    }

    /// Database connection string.
    #[must_use]
    pub fn connection_url(&self) -> Option<&str> {
        self.get(keys::CONNECTION_URL)
    }

    /// Servlet container port, as stored.
    #[must_use]
    pub fn tomcat_port(&self) -> Option<&str> {
        self.get(keys::TOMCAT_PORT)
    }

    /// Iterate over the pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

/// Whitespace as the properties format defines it.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Join continued lines and drop comments and blank lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    let text = text.replace("\r\n", "\n");
    for natural in text.split(['\n', '\r']) {
        let trimmed = natural.trim_start_matches(is_blank);
        let mut line = match pending.take() {
            Some(mut joined) => {
                joined.push_str(trimmed);
                joined
            }
            None if trimmed.is_empty() || trimmed.starts_with(['#', '!']) => continue,
            None => trimmed.to_string(),
        };

        if continues(&line) {
            line.pop();
            pending = Some(line);
        } else if !line.is_empty() {
            lines.push(line);
        }
    }

    if let Some(line) = pending.filter(|l| !l.is_empty()) {
        lines.push(line);
    }
    lines
}

/// An odd run of trailing backslashes escapes the line break.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split one logical line into its decoded key and value.
fn split_entry(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                let mut j = i + 1;
                while j < chars.len() && is_blank(chars[j]) {
                    j += 1;
                }
                if j < chars.len() && matches!(chars[j], '=' | ':') {
                    j += 1;
                }
                value_start = j;
                break;
            }
            _ => i += 1,
        }
    }

    while value_start < chars.len() && is_blank(chars[value_start]) {
        value_start += 1;
    }

    (unescape(&chars[..key_end]), unescape(&chars[value_start..]))
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        // A lone trailing backslash is dropped.
        let Some(&escaped) = chars.get(i) else {
            break;
        };
        i += 1;
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\u{000C}'),
            'u' => match hex_unit(chars, i) {
                Some(unit) => {
                    i += 4;
                    let mut units = vec![unit];
                    // A surrogate pair is spelled as two consecutive escapes.
                    if (0xD800..0xDC00).contains(&unit)
                        && chars.get(i) == Some(&'\\')
                        && chars.get(i + 1) == Some(&'u')
                    {
                        if let Some(low) = hex_unit(chars, i + 2)
                            .filter(|low| (0xDC00..0xE000).contains(low))
                        {
                            units.push(low);
                            i += 6;
                        }
                    }
                    out.extend(
                        char::decode_utf16(units)
                            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
                    );
                }
                // Malformed escapes are kept as text rather than rejected.
                None => out.push('u'),
            },
            other => out.push(other),
        }
    }
    out
}

/// Escape `text` so that [`ConfigRecord::parse`] reads it back unchanged.
///
/// Only characters the parser would otherwise consume are escaped, so plain
/// values such as connection strings are written as they are.
pub(crate) fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn hex_unit(chars: &[char], at: usize) -> Option<u16> {
    let digits = chars.get(at..at + 4)?;
    if !digits.iter().all(char::is_ascii_hexdigit) {
        return None;
    }
    u16::from_str_radix(&digits.iter().collect::<String>(), 16).ok()
}
