use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::ConnectionKey;

/// Comment stamped on entries that exist in the controller's blueprint but in
/// no uploaded spreadsheet row.
pub const ONLY_IN_BLUEPRINT: &str = "Only in Blueprint";

/// One logical value tracked from both provenances.
///
/// `input` comes from the spreadsheet, `fetched` from the controller API.
/// Either side may be absent; absence means "not supplied by that source".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair<T> {
    pub input: Option<T>,
    pub fetched: Option<T>,
}

impl<T> Default for FieldPair<T> {
    fn default() -> Self {
        Self {
            input: None,
            fetched: None,
        }
    }
}

impl<T: Clone> FieldPair<T> {
    pub fn from_input(input: Option<T>) -> Self {
        Self {
            input,
            fetched: None,
        }
    }

    /// Input value if present, fetched value otherwise.
    pub fn preferred(&self) -> Option<T> {
        self.input.clone().or_else(|| self.fetched.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFields {
    pub name: FieldPair<String>,
    pub interface: FieldPair<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFields {
    pub speed: FieldPair<String>,
    pub is_external: FieldPair<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagFields {
    pub name: FieldPair<String>,
    pub mode: FieldPair<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityFields {
    /// Comma-separated connectivity template names.
    pub templates: FieldPair<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFields {
    pub server: FieldPair<String>,
    pub switch: FieldPair<String>,
    pub link: FieldPair<String>,
    pub link_group: FieldPair<String>,
}

/// Where an entry's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    InputOnly,
    ApiOnly,
    Both,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::InputOnly => "input-only",
            EntrySource::ApiOnly => "api-only",
            EntrySource::Both => "both",
        }
    }
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub source: EntrySource,
    pub last_updated: DateTime<Utc>,
    pub blueprint: Option<String>,
    pub comment: Option<String>,
}

/// Canonical record for one switch-interface connection.
///
/// The identity (key, switch, interface) is fixed at construction; only the
/// grouped field pairs and metadata change afterwards, and only the API merge
/// writes the fetched sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningEntry {
    connection_key: ConnectionKey,
    switch_name: String,
    switch_interface: String,
    pub server: ServerFields,
    pub network: NetworkFields,
    pub lag: LagFields,
    pub connectivity: ConnectivityFields,
    pub tags: TagFields,
    pub metadata: EntryMetadata,
    /// Original controller payload, kept for debugging; never compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_api_data: Option<Value>,
}

impl ProvisioningEntry {
    pub fn new(switch_name: &str, switch_interface: &str, source: EntrySource) -> Self {
        Self::with_key(
            ConnectionKey::new(switch_name, switch_interface),
            switch_name,
            switch_interface,
            source,
        )
    }

    /// Build an entry under an existing key, e.g. one read back from the
    /// controller, without re-deriving it from the identity parts.
    pub fn with_key(
        connection_key: ConnectionKey,
        switch_name: &str,
        switch_interface: &str,
        source: EntrySource,
    ) -> Self {
        Self {
            connection_key,
            switch_name: switch_name.to_string(),
            switch_interface: switch_interface.to_string(),
            server: ServerFields::default(),
            network: NetworkFields::default(),
            lag: LagFields::default(),
            connectivity: ConnectivityFields::default(),
            tags: TagFields::default(),
            metadata: EntryMetadata {
                source,
                last_updated: Utc::now(),
                blueprint: None,
                comment: None,
            },
            raw_api_data: None,
        }
    }

    pub fn key(&self) -> &ConnectionKey {
        &self.connection_key
    }

    pub fn switch_name(&self) -> &str {
        &self.switch_name
    }

    pub fn switch_interface(&self) -> &str {
        &self.switch_interface
    }

    pub fn source(&self) -> EntrySource {
        self.metadata.source
    }

    pub(crate) fn touch(&mut self) {
        self.metadata.last_updated = Utc::now();
    }
}
