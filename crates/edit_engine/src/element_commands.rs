//! Commands that add, erase and duplicate components

use crate::command::parse_payload;
use crate::{
    describe_components, Command, DeserializeContext, EditError, EditorLocalization, Result,
    SerializableCommand,
};
use doc_model::{
    deserialize_component, Component, ComponentEnvelope, ComponentId, ComponentRegistry, Document,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

pub const ADD_COMMAND_KIND: &str = "add-element";
pub const ERASE_COMMAND_KIND: &str = "erase";
pub const DUPLICATE_COMMAND_KIND: &str = "duplicate";

// =============================================================================
// Add
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct AddPayload {
    element: ComponentEnvelope,
}

/// Adds one component to the document.
///
/// The command owns the component whenever it is not in the document. The
/// envelope is captured at construction, so the serialized command always
/// replays the component as it was when it was added.
#[derive(Debug)]
pub struct AddComponent {
    id: ComponentId,
    component: Option<Box<dyn Component>>,
    envelope: Option<ComponentEnvelope>,
}

impl AddComponent {
    pub fn new(component: Box<dyn Component>) -> Self {
        let envelope = component.serialize().ok();
        Self {
            id: component.id().clone(),
            component: Some(component),
            envelope,
        }
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.id
    }

    fn component<'a>(&'a self, document: &'a Document) -> Option<&'a dyn Component> {
        match &self.component {
            Some(component) => Some(component.as_ref()),
            None => document.lookup(&self.id),
        }
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: AddPayload = parse_payload(ADD_COMMAND_KIND, data)?;
        Ok(Box::new(Self::from_envelope(context.components, payload.element)?))
    }

    fn from_envelope(registry: &ComponentRegistry, envelope: ComponentEnvelope) -> Result<Self> {
        let component = deserialize_component(registry, &envelope)?;
        Ok(Self {
            id: component.id().clone(),
            component: Some(component),
            envelope: Some(envelope),
        })
    }
}

/// A command that adds `component` to a document when applied
pub fn add_component(component: Box<dyn Component>) -> AddComponent {
    AddComponent::new(component)
}

impl Command for AddComponent {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        if document.contains(&self.id) {
            return Err(doc_model::DocModelError::AlreadyInDocument(self.id.clone()).into());
        }
        let component = self
            .component
            .take()
            .ok_or_else(|| EditError::InvalidState(format!("{} is already added", self.id)))?;
        document.insert(component)?;
        document.queue_rerender();
        Ok(())
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        if self.component.is_some() {
            return Err(EditError::InvalidState(format!("{} was never added", self.id)));
        }
        if !document.contains(&self.id) {
            return Err(EditError::DanglingReference(self.id.clone()));
        }
        self.component = Some(document.remove(&self.id)?);
        document.queue_rerender();
        Ok(())
    }

    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String {
        let description = describe_components(self.component(document), localization);
        localization.added_element(&description)
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        self.envelope.as_ref().map(|_| self as &dyn SerializableCommand)
    }
}

impl SerializableCommand for AddComponent {
    fn command_kind(&self) -> &'static str {
        ADD_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        let element = self
            .envelope
            .clone()
            .ok_or_else(|| EditError::NotSerializable(format!("component {}", self.id)))?;
        Ok(serde_json::to_value(AddPayload { element })?)
    }
}

// =============================================================================
// Erase
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ErasePayload {
    ids: Vec<ComponentId>,
}

/// Removes components from the document. Erased components are kept by the
/// command so that undo can put them back.
#[derive(Debug)]
pub struct EraseComponents {
    ids: Vec<ComponentId>,
    erased: Vec<Box<dyn Component>>,
}

impl EraseComponents {
    pub fn new(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        Self { ids, erased: Vec::new() }
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        _context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: ErasePayload = parse_payload(ERASE_COMMAND_KIND, data)?;
        Ok(Box::new(Self::new(payload.ids)))
    }
}

impl Command for EraseComponents {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        if !self.erased.is_empty() {
            return Err(EditError::InvalidState("components are already erased".to_string()));
        }
        if let Some(missing) = self.ids.iter().find(|id| !document.contains(id)) {
            return Err(EditError::DanglingReference(missing.clone()));
        }

        for id in &self.ids {
            self.erased.push(document.remove(id)?);
        }
        document.queue_rerender();
        debug!(count = self.erased.len(), "Erased components");
        Ok(())
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        if let Some(taken) = self.erased.iter().find(|c| document.contains(c.id())) {
            return Err(doc_model::DocModelError::AlreadyInDocument(taken.id().clone()).into());
        }

        for component in self.erased.drain(..) {
            document.insert(component)?;
        }
        document.queue_rerender();
        Ok(())
    }

    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String {
        let description = if self.erased.is_empty() {
            describe_components(self.ids.iter().filter_map(|id| document.lookup(id)), localization)
        } else {
            describe_components(self.erased.iter().map(|c| c.as_ref()), localization)
        };
        localization.erased_elements(&description, self.ids.len())
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        Some(self)
    }
}

impl SerializableCommand for EraseComponents {
    fn command_kind(&self) -> &'static str {
        ERASE_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(ErasePayload { ids: self.ids.clone() })?)
    }
}

// =============================================================================
// Duplicate
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuplicatePayload {
    source_ids: Vec<ComponentId>,
    clones: Vec<ComponentEnvelope>,
}

/// Adds copies of existing components. Copies get fresh ids and are placed
/// above everything that existed when they were made.
#[derive(Debug)]
pub struct DuplicateComponents {
    source_ids: Vec<ComponentId>,
    additions: Vec<AddComponent>,
}

impl DuplicateComponents {
    /// Clone the components named by `ids` from `document`
    pub fn new(
        document: &Document,
        registry: &ComponentRegistry,
        ids: impl IntoIterator<Item = ComponentId>,
    ) -> Result<Self> {
        let source_ids: Vec<ComponentId> = ids.into_iter().collect();
        let mut additions = Vec::with_capacity(source_ids.len());
        for id in &source_ids {
            let source = document
                .lookup(id)
                .ok_or_else(|| EditError::DanglingReference(id.clone()))?;
            additions.push(AddComponent::new(source.clone_component(registry)?));
        }
        Ok(Self { source_ids, additions })
    }

    pub fn source_ids(&self) -> &[ComponentId] {
        &self.source_ids
    }

    /// Ids of the copies
    pub fn clone_ids(&self) -> impl Iterator<Item = &ComponentId> + '_ {
        self.additions.iter().map(AddComponent::component_id)
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: DuplicatePayload = parse_payload(DUPLICATE_COMMAND_KIND, data)?;
        let additions = payload
            .clones
            .into_iter()
            .map(|envelope| AddComponent::from_envelope(context.components, envelope))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(Self {
            source_ids: payload.source_ids,
            additions,
        }))
    }
}

impl Command for DuplicateComponents {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        for index in 0..self.additions.len() {
            if let Err(e) = self.additions[index].apply(document) {
                for applied in self.additions[..index].iter_mut().rev() {
                    applied.unapply(document)?;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        for addition in self.additions.iter_mut().rev() {
            addition.unapply(document)?;
        }
        Ok(())
    }

    fn description(&self, document: &Document, localization: &dyn EditorLocalization) -> String {
        let description = describe_components(
            self.additions.iter().filter_map(|addition| addition.component(document)),
            localization,
        );
        localization.duplicated_elements(&description, self.additions.len())
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        self.additions
            .iter()
            .all(|addition| addition.envelope.is_some())
            .then_some(self as &dyn SerializableCommand)
    }
}

impl SerializableCommand for DuplicateComponents {
    fn command_kind(&self) -> &'static str {
        DUPLICATE_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        let clones = self
            .additions
            .iter()
            .map(|addition| {
                addition
                    .envelope
                    .clone()
                    .ok_or_else(|| EditError::NotSerializable(format!("component {}", addition.id)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_value(DuplicatePayload {
            source_ids: self.source_ids.clone(),
            clones,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_stroke, stroke_in, TestLocalization};

    #[test]
    fn test_add_apply_unapply() {
        let mut document = Document::new();
        let stroke = new_stroke(0.0, 0.0);
        let id = stroke.id().clone();
        let mut command = add_component(stroke);

        command.apply(&mut document).unwrap();
        assert!(document.contains(&id));
        assert_eq!(command.description(&document, &TestLocalization), "Added Stroke");

        command.unapply(&mut document).unwrap();
        assert!(document.is_empty());
        command.apply(&mut document).unwrap();
        assert!(document.contains(&id));
    }

    #[test]
    fn test_add_twice_is_rejected() {
        let mut document = Document::new();
        let mut command = add_component(new_stroke(0.0, 0.0));
        command.apply(&mut document).unwrap();
        assert!(command.apply(&mut document).is_err());
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_erase_and_restore() {
        let mut document = Document::new();
        let a = stroke_in(&mut document, 0.0, 0.0);
        let b = stroke_in(&mut document, 20.0, 0.0);
        let keep = stroke_in(&mut document, 40.0, 0.0);

        let mut command = EraseComponents::new([a.clone(), b.clone(), a.clone()]);
        assert_eq!(command.ids().len(), 2);
        assert_eq!(command.description(&document, &TestLocalization), "Erased 2 Stroke");

        command.apply(&mut document).unwrap();
        assert_eq!(document.len(), 1);
        assert!(document.contains(&keep));

        command.unapply(&mut document).unwrap();
        assert!(document.contains(&a) && document.contains(&b));
    }

    #[test]
    fn test_erase_missing_component_changes_nothing() {
        let mut document = Document::new();
        let a = stroke_in(&mut document, 0.0, 0.0);
        let mut command = EraseComponents::new([a.clone(), ComponentId::from("missing-id")]);
        assert!(matches!(command.apply(&mut document), Err(EditError::DanglingReference(_))));
        assert!(document.contains(&a));
    }

    #[test]
    fn test_duplicate() {
        let mut document = Document::new();
        let registry = ComponentRegistry::with_builtin_components();
        let source = stroke_in(&mut document, 0.0, 0.0);
        let mut command = DuplicateComponents::new(&document, &registry, [source.clone()]).unwrap();
        let copy: ComponentId = command.clone_ids().next().unwrap().clone();
        assert_ne!(copy, source);

        command.apply(&mut document).unwrap();
        assert_eq!(document.len(), 2);
        let source_z = document.lookup(&source).unwrap().z_index();
        assert!(document.lookup(&copy).unwrap().z_index() > source_z);
        assert_eq!(command.description(&document, &TestLocalization), "Duplicated 1 Stroke");

        command.unapply(&mut document).unwrap();
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_duplicate_missing_source() {
        let document = Document::new();
        let registry = ComponentRegistry::with_builtin_components();
        let missing = ComponentId::from("missing-id");
        let result = DuplicateComponents::new(&document, &registry, [missing]);
        assert!(matches!(result, Err(EditError::DanglingReference(_))));
    }
}
