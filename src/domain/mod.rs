pub mod analysis;
pub mod api_data;
pub mod entry;
pub mod entry_set;
pub mod fingerprint;
pub mod ports;
pub mod row;
pub mod value_objects;
