//! Command execution engine

use crate::{
    Command, CommandEnvelope, CommandRegistry, EditorLocalization, EngineSettings, Result,
    UndoManager,
};
use doc_model::{ComponentEnvelope, ComponentRegistry, Document};
use tracing::debug;

/// Owns the document and its history and runs commands against them.
///
/// All mutation goes through [`EditingEngine::dispatch`] (or undo/redo), so a
/// single engine is the single writer for its document. Wrap it in a mutex to
/// share it between threads.
pub struct EditingEngine {
    /// Current document
    document: Document,
    /// Undo manager
    undo_manager: UndoManager,
    components: ComponentRegistry,
    commands: CommandRegistry,
    localization: Box<dyn EditorLocalization + Send + Sync>,
    settings: EngineSettings,
}

impl EditingEngine {
    /// Create an editing engine with an empty document and default settings
    pub fn new(localization: Box<dyn EditorLocalization + Send + Sync>) -> Self {
        Self::with_settings(EngineSettings::default(), localization)
    }

    pub fn with_settings(
        settings: EngineSettings,
        localization: Box<dyn EditorLocalization + Send + Sync>,
    ) -> Self {
        Self {
            document: Document::with_cell_size(settings.spatial_index.cell_size),
            undo_manager: UndoManager::with_max_entries(settings.history.max_entries),
            components: ComponentRegistry::with_builtin_components(),
            commands: CommandRegistry::with_builtin_commands(),
            localization,
            settings,
        }
    }

    /// Get the current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn component_registry(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn component_registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    pub fn command_registry(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn command_registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    pub fn localization(&self) -> &dyn EditorLocalization {
        self.localization.as_ref()
    }

    pub fn set_localization(&mut self, localization: Box<dyn EditorLocalization + Send + Sync>) {
        self.localization = localization;
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo_manager
    }

    /// Apply a command and record it for undo. A command that fails is not
    /// recorded.
    pub fn dispatch(&mut self, mut command: Box<dyn Command>) -> Result<()> {
        command.apply(&mut self.document)?;
        debug!(
            command = %command.description(&self.document, self.localization.as_ref()),
            "Dispatched"
        );
        self.undo_manager.push(command);
        Ok(())
    }

    /// Apply a command without recording it
    pub fn dispatch_without_history(&mut self, command: &mut dyn Command) -> Result<()> {
        command.apply(&mut self.document)
    }

    /// Rebuild a serialized command, apply it and record it
    pub fn apply_serialized(&mut self, envelope: &CommandEnvelope) -> Result<()> {
        let command = self.commands.deserialize(envelope, &self.components)?;
        self.dispatch(command)
    }

    /// Describe `command` with the engine's localization table
    pub fn describe(&self, command: &dyn Command) -> String {
        command.description(&self.document, self.localization.as_ref())
    }

    /// Undo the last command. Returns the announcement to read out, or
    /// `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<Option<String>> {
        if !self.undo_manager.undo(&mut self.document)? {
            return Ok(None);
        }
        Ok(self
            .undo_manager
            .peek_redo()
            .map(|command| self.localization.undo_announcement(&self.describe(command))))
    }

    /// Redo the last undone command. Returns the announcement to read out,
    /// or `None` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<Option<String>> {
        if !self.undo_manager.redo(&mut self.document)? {
            return Ok(None);
        }
        Ok(self
            .undo_manager
            .peek_undo()
            .map(|command| self.localization.redo_announcement(&self.describe(command))))
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    /// Number of redraws requested by commands since the last call
    pub fn take_rerender_requests(&mut self) -> u64 {
        self.document.take_rerender_requests()
    }

    /// Envelopes for every component in the document
    pub fn save_document(&self) -> Result<Vec<ComponentEnvelope>> {
        Ok(self.document.to_envelopes()?)
    }

    /// Replace the document with one loaded from `envelopes`. History is
    /// cleared; on error the current document is kept.
    pub fn load_document(&mut self, envelopes: &[ComponentEnvelope]) -> Result<usize> {
        let mut document = Document::with_cell_size(self.settings.spatial_index.cell_size);
        let count = document.load_envelopes(&self.components, envelopes)?;
        self.document = document;
        self.undo_manager.clear();
        self.document.queue_rerender();
        Ok(count)
    }
}
