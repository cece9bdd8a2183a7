use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::entry::ProvisioningEntry;
use crate::domain::value_objects::Fingerprint;

/// Compute a SHA-256 fingerprint of an entry snapshot's content.
///
/// Algorithm:
/// 1. Each entry is serialised to JSON with `metadata.last_updated` and
///    `raw_api_data` removed, so refreshing timestamps or carrying a payload
///    does not count as a change.
/// 2. Object keys are sorted (serde_json's default `Map` is a `BTreeMap`).
/// 3. Entry strings are sorted so the fingerprint ignores display order.
/// 4. All strings are joined with `\n` and hashed.
pub fn fingerprint<'a, I>(entries: I) -> Fingerprint
where
    I: IntoIterator<Item = &'a ProvisioningEntry>,
{
    let mut entry_strings: Vec<String> = entries
        .into_iter()
        .map(|entry| {
            let mut value = serde_json::to_value(entry).unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.remove("raw_api_data");
                if let Some(Value::Object(meta)) = map.get_mut("metadata") {
                    meta.remove("last_updated");
                }
            }
            value.to_string()
        })
        .collect();

    entry_strings.sort_unstable();

    let content = entry_strings.join("\n");
    let hash = Sha256::digest(content.as_bytes());
    Fingerprint(format!("{:x}", hash))
}
