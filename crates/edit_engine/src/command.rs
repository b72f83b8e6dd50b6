//! Command system for document editing
//!
//! A command is a reversible unit of change. The caller applies it to a
//! [`Document`] and then records it in the [`UndoManager`](crate::UndoManager);
//! undo and redo call `unapply` and `apply` on the recorded instance.

use crate::{EditError, EditorLocalization, Result};
use doc_model::{ComponentRegistry, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Trait for all editing commands
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to a document
    fn apply(&mut self, document: &mut Document) -> Result<()>;

    /// Revert the effect of [`Command::apply`]
    fn unapply(&mut self, document: &mut Document) -> Result<()>;

    /// Human-readable summary, built from `localization`
    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String;

    /// The serializable view of this command, if it has one
    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        None
    }

    /// Build the envelope for this command
    fn serialize(&self) -> Result<CommandEnvelope> {
        let serializable = self
            .as_serializable()
            .ok_or_else(|| EditError::NotSerializable(format!("{self:?}")))?;
        Ok(CommandEnvelope {
            kind: serializable.command_kind().to_string(),
            data: serializable.serialize_payload()?,
        })
    }
}

/// A command that can be written to an envelope and rebuilt later.
///
/// Serializable commands refer to components by id, so the rebuilt command
/// can be applied to any document holding components with those ids.
pub trait SerializableCommand: Command {
    /// Kind tag under which the deserializer is registered
    fn command_kind(&self) -> &'static str;

    fn serialize_payload(&self) -> Result<Value>;
}

/// Wire form of a serializable command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl CommandEnvelope {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EditError::NotDeserializable(format!("invalid command envelope: {e}")))
    }
}

/// Registries available while rebuilding a command
#[derive(Debug, Clone, Copy)]
pub struct DeserializeContext<'a> {
    pub components: &'a ComponentRegistry,
    pub commands: &'a CommandRegistry,
}

impl DeserializeContext<'_> {
    pub fn deserialize(&self, envelope: &CommandEnvelope) -> Result<Box<dyn Command>> {
        self.commands.deserialize(envelope, self.components)
    }
}

/// Rebuilds a command from the `data` field of its envelope
pub type CommandDeserializeCallback =
    fn(&Value, &DeserializeContext<'_>) -> Result<Box<dyn Command>>;

/// Command kind tag -> deserialization callback
#[derive(Clone, Default)]
pub struct CommandRegistry {
    callbacks: HashMap<String, CommandDeserializeCallback>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.callbacks.keys().collect();
        kinds.sort_unstable();
        f.debug_struct("CommandRegistry").field("kinds", &kinds).finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows every command defined in this crate
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::TRANSFORM_COMMAND_KIND,
            crate::TransformComponent::deserialize_command,
        );
        registry.register(crate::ADD_COMMAND_KIND, crate::AddComponent::deserialize_command);
        registry.register(crate::ERASE_COMMAND_KIND, crate::EraseComponents::deserialize_command);
        registry.register(
            crate::DUPLICATE_COMMAND_KIND,
            crate::DuplicateComponents::deserialize_command,
        );
        registry.register(crate::BATCH_COMMAND_KIND, crate::CommandBatch::deserialize_command);
        registry.register(crate::INVERSE_COMMAND_KIND, crate::InvertedCommand::deserialize_command);
        registry
    }

    /// Register `kind`, replacing any earlier entry
    pub fn register(&mut self, kind: impl Into<String>, deserialize: CommandDeserializeCallback) {
        let kind = kind.into();
        debug!(kind = %kind, "registering command kind");
        self.callbacks.insert(kind, deserialize);
    }

    pub fn unregister(&mut self, kind: &str) -> bool {
        self.callbacks.remove(kind).is_some()
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.callbacks.contains_key(kind)
    }

    /// Rebuild a command. The result is unresolved: component ids are looked
    /// up in whichever document it is applied to.
    pub fn deserialize(
        &self,
        envelope: &CommandEnvelope,
        components: &ComponentRegistry,
    ) -> Result<Box<dyn Command>> {
        let callback = self
            .callbacks
            .get(&envelope.kind)
            .ok_or_else(|| EditError::UnknownCommand(envelope.kind.clone()))?;
        if envelope.data.is_null() {
            return Err(EditError::NotDeserializable(format!(
                "{} envelope has no data",
                envelope.kind
            )));
        }

        let context = DeserializeContext { components, commands: self };
        callback(&envelope.data, &context)
    }
}

/// Parse a command payload, reporting failures as `NotDeserializable`
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(kind: &str, data: &Value) -> Result<T> {
    T::deserialize(data)
        .map_err(|e| EditError::NotDeserializable(format!("invalid {kind} payload: {e}")))
}
