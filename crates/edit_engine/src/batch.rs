//! Composite commands: unions of commands and inverted commands

use crate::command::parse_payload;
use crate::{
    Command, CommandEnvelope, DeserializeContext, EditorLocalization, Result, SerializableCommand,
};
use doc_model::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const BATCH_COMMAND_KIND: &str = "union";
pub const INVERSE_COMMAND_KIND: &str = "inverse";

#[derive(Debug, Serialize, Deserialize)]
struct BatchPayload {
    commands: Vec<CommandEnvelope>,
}

/// Several commands applied and undone as one history entry.
///
/// Applying is all-or-nothing: if a part fails, the parts before it are
/// unapplied again before the error is returned.
#[derive(Debug, Default)]
pub struct CommandBatch {
    commands: Vec<Box<dyn Command>>,
}

impl CommandBatch {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: BatchPayload = parse_payload(BATCH_COMMAND_KIND, data)?;
        let commands = payload
            .commands
            .iter()
            .map(|envelope| context.deserialize(envelope))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(Self::new(commands)))
    }
}

impl Command for CommandBatch {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        for index in 0..self.commands.len() {
            if let Err(e) = self.commands[index].apply(document) {
                warn!(part = index, error = %e, "Batch part failed, rolling back");
                for applied in self.commands[..index].iter_mut().rev() {
                    applied.unapply(document)?;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        let count = self.commands.len();
        for index in (0..count).rev() {
            if let Err(e) = self.commands[index].unapply(document) {
                warn!(part = index, error = %e, "Batch part failed to undo, rolling back");
                for undone in self.commands[index + 1..].iter_mut() {
                    undone.apply(document)?;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String {
        let descriptions: Vec<String> = self
            .commands
            .iter()
            .map(|command| command.description(document, localization))
            .collect();
        match descriptions.first() {
            Some(first) if descriptions.iter().all(|d| d == first) => {
                localization.union_of(first, descriptions.len())
            }
            _ => descriptions.join(", "),
        }
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        self.commands
            .iter()
            .all(|command| command.as_serializable().is_some())
            .then_some(self as &dyn SerializableCommand)
    }
}

impl SerializableCommand for CommandBatch {
    fn command_kind(&self) -> &'static str {
        BATCH_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        let commands = self
            .commands
            .iter()
            .map(|command| command.serialize())
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_value(BatchPayload { commands })?)
    }
}

/// Combine `commands` into a single history entry
pub fn unite_commands(commands: Vec<Box<dyn Command>>) -> CommandBatch {
    CommandBatch::new(commands)
}

#[derive(Debug, Serialize, Deserialize)]
struct InversePayload {
    command: CommandEnvelope,
}

/// Swaps `apply` and `unapply` of the wrapped command
#[derive(Debug)]
pub struct InvertedCommand {
    inner: Box<dyn Command>,
}

impl InvertedCommand {
    pub fn new(inner: Box<dyn Command>) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> Box<dyn Command> {
        self.inner
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: InversePayload = parse_payload(INVERSE_COMMAND_KIND, data)?;
        Ok(Box::new(Self::new(context.deserialize(&payload.command)?)))
    }
}

/// A command that undoes `command` when applied
pub fn invert_command(command: Box<dyn Command>) -> InvertedCommand {
    InvertedCommand::new(command)
}

impl Command for InvertedCommand {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        self.inner.unapply(document)
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        self.inner.apply(document)
    }

    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String {
        localization.inverse_of(&self.inner.description(document, localization))
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        self.inner
            .as_serializable()
            .map(|_| self as &dyn SerializableCommand)
    }
}

impl SerializableCommand for InvertedCommand {
    fn command_kind(&self) -> &'static str {
        INVERSE_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(InversePayload {
            command: self.inner.serialize()?,
        })?)
    }
}
