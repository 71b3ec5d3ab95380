//! Wire types for the diagram notification protocol.
//!
//! Both directions use the `diagram/accept` notification with an [`ActionMessage`] payload.
//! `diagram/didClose` carries the client id as a bare JSON string.

use elkweb_core::SceneGraph;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DIAGRAM_ACCEPT_NOTIFICATION: &str = "diagram/accept";
pub const DID_CLOSE_NOTIFICATION: &str = "diagram/didClose";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMessage {
    /// Absent on messages meant for every client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub action: Action,
}

impl ActionMessage {
    pub fn new(client_id: impl Into<String>, action: Action) -> Self {
        Self {
            client_id: Some(client_id.into()),
            action,
        }
    }
}

/// An action envelope: the `kind` discriminator plus whatever fields that kind carries.
///
/// Kinds this crate does not know about pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn is<T: TypedAction>(&self) -> bool {
        self.kind == T::KIND
    }

    pub fn from_typed<T: TypedAction>(typed: &T) -> serde_json::Result<Self> {
        let payload = match serde_json::to_value(typed)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Ok(Self {
            kind: T::KIND.to_string(),
            payload,
        })
    }

    /// `Ok(None)` when the kind does not match `T`.
    pub fn to_typed<T: TypedAction>(&self) -> serde_json::Result<Option<T>> {
        if !self.is::<T>() {
            return Ok(None);
        }
        serde_json::from_value(Value::Object(self.payload.clone())).map(Some)
    }
}

/// A concrete action type with a fixed `kind`.
pub trait TypedAction: Serialize + DeserializeOwned {
    const KIND: &'static str;

    fn into_action(self) -> serde_json::Result<Action>
    where
        Self: Sized,
    {
        Action::from_typed(&self)
    }
}

/// Asks the layout service to switch engine versions. `None` selects the default version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLayoutVersionAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ChangeLayoutVersionAction {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
        }
    }
}

impl TypedAction for ChangeLayoutVersionAction {
    const KIND: &'static str = "versionChange";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelAction {
    pub new_root: SceneGraph,
    #[serde(default = "default_animate")]
    pub animate: bool,
}

fn default_animate() -> bool {
    true
}

impl UpdateModelAction {
    pub fn new(new_root: SceneGraph) -> Self {
        Self {
            new_root,
            animate: true,
        }
    }
}

impl TypedAction for UpdateModelAction {
    const KIND: &'static str = "updateModel";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModelAction {
    pub new_root: SceneGraph,
}

impl TypedAction for SetModelAction {
    const KIND: &'static str = "setModel";
}
