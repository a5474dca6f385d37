use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings record shared with the settings app.
///
/// Only the fields that drive persistence are typed here. Everything else the
/// settings app stores (theme, background) rides along in `other` so that
/// saving from this side never drops it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Mirror the tree into the durable tier on every commit.
    #[serde(rename = "persistFS", default)]
    pub persist_fs: bool,
    /// Empty the trash when the session shuts down.
    #[serde(default)]
    pub empty_trash_on_exit: bool,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
