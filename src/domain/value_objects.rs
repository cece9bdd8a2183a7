use serde::{Deserialize, Serialize};

/// Separator between the switch and interface halves of a [`ConnectionKey`].
pub const KEY_SEPARATOR: char = '-';

/// Unique identifier of one physical connection point: `<switch>-<interface>`.
///
/// Both the spreadsheet side and the controller side key their records with
/// this convention, which is what lets the two be folded together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionKey(pub String);

impl ConnectionKey {
    pub fn new(switch_name: &str, switch_interface: &str) -> Self {
        Self(format!("{switch_name}{KEY_SEPARATOR}{switch_interface}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover `(switch, interface)` from the joined key.
    ///
    /// Switch names routinely contain the separator themselves
    /// (`leaf-01-et-0/0/1`), so the split point is the first separator whose
    /// suffix looks like an interface name. Without such a suffix the last
    /// separator is used; a key without any separator is all switch.
    pub fn split(&self) -> (String, String) {
        let key = self.0.as_str();
        let positions: Vec<usize> = key
            .char_indices()
            .filter(|(_, c)| *c == KEY_SEPARATOR)
            .map(|(i, _)| i)
            .collect();

        let split_at = positions
            .iter()
            .copied()
            .find(|&i| looks_like_interface(&key[i + 1..]))
            .or_else(|| positions.last().copied());

        match split_at {
            Some(i) => (key[..i].to_string(), key[i + 1..].to_string()),
            None => (key.to_string(), String::new()),
        }
    }
}

impl std::fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ConnectionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// `et-0/0/1`, `xe-0/0/12:2`, `Ethernet1/1`, `eth0`, `ge-1/0/0.0`.
fn looks_like_interface(s: &str) -> bool {
    let letters = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return false;
    }
    let rest = &s[letters..];
    let rest = rest.strip_prefix(KEY_SEPARATOR).unwrap_or(rest);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit() || matches!(c, '/' | ':' | '.'))
}

/// SHA-256 hex fingerprint of an entry snapshot's canonical content.
///
/// Computed by `linkrecon::fingerprint(entries)`. The review session compares
/// fingerprints to decide whether a merge/filter cycle actually changed the
/// data it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Returns the raw hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(key: &str) -> (String, String) {
        ConnectionKey::from(key).split()
    }

    #[test]
    fn new_joins_with_separator() {
        assert_eq!(
            ConnectionKey::new("leaf-01", "et-0/0/1").as_str(),
            "leaf-01-et-0/0/1"
        );
    }

    #[test]
    fn split_junos_style_interface() {
        assert_eq!(
            split("leaf-01-et-0/0/1"),
            ("leaf-01".to_string(), "et-0/0/1".to_string())
        );
    }

    #[test]
    fn split_channelised_interface() {
        assert_eq!(
            split("spine1-xe-0/0/12:2"),
            ("spine1".to_string(), "xe-0/0/12:2".to_string())
        );
    }

    #[test]
    fn split_interface_without_dash() {
        assert_eq!(
            split("leaf-02-Ethernet1/1"),
            ("leaf-02".to_string(), "Ethernet1/1".to_string())
        );
    }

    #[test]
    fn split_falls_back_to_last_separator() {
        assert_eq!(
            split("rack-a-port"),
            ("rack-a".to_string(), "port".to_string())
        );
    }

    #[test]
    fn split_without_separator_is_all_switch() {
        assert_eq!(split("standalone"), ("standalone".to_string(), String::new()));
    }

    #[test]
    fn split_round_trips_new() {
        let key = ConnectionKey::new("dc1-leaf-03", "ge-0/0/7");
        assert_eq!(
            key.split(),
            ("dc1-leaf-03".to_string(), "ge-0/0/7".to_string())
        );
    }
}
