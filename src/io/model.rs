use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deserializer::{LoadState, Serializable};

/// On-disk shape of a [`Model`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// Generic named object with free-form parameters.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    pub params: BTreeMap<String, Value>,
    state: LoadState,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Both load hooks completed.
    pub fn is_loaded(&self) -> bool {
        self.state.pre_done() && self.state.post_done()
    }
}

impl Serializable for Model {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_state(&mut self) -> &mut LoadState {
        &mut self.state
    }
}
