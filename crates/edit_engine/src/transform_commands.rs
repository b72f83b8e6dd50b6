//! Transform and reindex commands
//!
//! [`TransformComponent`] applies an affine transform to one component and
//! moves it to a target z-index. Changing only the z-index is the same
//! command with an identity transform.

use crate::command::parse_payload;
use crate::{
    Command, ComponentRef, DeserializeContext, EditError, EditorLocalization, Result,
    SerializableCommand,
};
use doc_model::{clamp_z_index, next_z_index, reserve_z_index, Component, ComponentId, Document};
use geometry::Mat33;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const TRANSFORM_COMMAND_KIND: &str = "transform-element";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformPayload {
    id: ComponentId,
    transform: Mat33,
    target_z_index: i64,
    #[serde(default)]
    orig_z_index: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TransformComponent {
    target: ComponentRef,
    transform: Mat33,
    target_z_index: i64,
    /// Captured on first resolution when not known at construction
    orig_z_index: Option<i64>,
}

impl TransformComponent {
    /// Transform `component` and bring it to the top
    pub fn new(component: &(impl Component + ?Sized), transform: Mat33) -> Self {
        Self::with_z_index(component, transform, next_z_index())
    }

    /// Transform `component` and move it to `target_z_index`
    pub fn with_z_index(
        component: &(impl Component + ?Sized),
        transform: Mat33,
        target_z_index: i64,
    ) -> Self {
        let target_z_index = clamp_z_index(target_z_index);
        reserve_z_index(target_z_index);
        Self {
            target: ComponentRef::Resolved(component.id().clone()),
            transform,
            target_z_index,
            orig_z_index: Some(component.z_index()),
        }
    }

    /// A command bound only to an id, resolved when first applied
    pub fn unresolved(
        id: ComponentId,
        transform: Mat33,
        target_z_index: i64,
        orig_z_index: Option<i64>,
    ) -> Self {
        let target_z_index = clamp_z_index(target_z_index);
        // Later components must still draw above this one
        reserve_z_index(target_z_index);
        Self {
            target: ComponentRef::Unresolved(id),
            transform,
            target_z_index,
            orig_z_index,
        }
    }

    pub fn target(&self) -> &ComponentRef {
        &self.target
    }

    pub fn transform(&self) -> &Mat33 {
        &self.transform
    }

    pub fn target_z_index(&self) -> i64 {
        self.target_z_index
    }

    pub fn orig_z_index(&self) -> Option<i64> {
        self.orig_z_index
    }

    fn resolve(&mut self, document: &Document) -> Result<()> {
        self.target.resolve(document)?;
        if self.orig_z_index.is_none() {
            self.orig_z_index = document.lookup(self.target.id()).map(|c| c.z_index());
        }
        Ok(())
    }

    /// Detach the target, update it and attach it again so that every
    /// document index sees the new bounding box and z-index
    fn update(
        document: &mut Document,
        id: &ComponentId,
        z_index: i64,
        transform: &Mat33,
    ) -> Result<()> {
        let mut component = document.remove(id)?;
        component.base_mut().set_z_index(z_index);
        component.apply_transformation(transform);
        component.base_mut().touch();
        document.insert(component)?;
        document.queue_rerender();
        debug!(component = %id, z_index, "Transformed component");
        Ok(())
    }

    pub(crate) fn deserialize_command(
        data: &Value,
        _context: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Command>> {
        let payload: TransformPayload = parse_payload(TRANSFORM_COMMAND_KIND, data)?;
        Ok(Box::new(Self::unresolved(
            payload.id,
            payload.transform,
            payload.target_z_index,
            payload.orig_z_index,
        )))
    }
}

impl Command for TransformComponent {
    fn apply(&mut self, document: &mut Document) -> Result<()> {
        // A transform that cannot be undone is refused before anything moves
        self.transform.inverse()?;
        self.resolve(document)?;
        Self::update(document, self.target.id(), self.target_z_index, &self.transform)
    }

    fn unapply(&mut self, document: &mut Document) -> Result<()> {
        self.resolve(document)?;
        let orig_z_index = self
            .orig_z_index
            .ok_or_else(|| EditError::InvalidState("original z-index unknown".to_string()))?;
        let inverse = self.transform.inverse()?;
        Self::update(document, self.target.id(), orig_z_index, &inverse)
    }

    fn description(&self, _document: &Document, localization: &dyn EditorLocalization) -> String {
        localization.transformed_elements(1)
    }

    fn as_serializable(&self) -> Option<&dyn SerializableCommand> {
        Some(self)
    }
}

impl SerializableCommand for TransformComponent {
    fn command_kind(&self) -> &'static str {
        TRANSFORM_COMMAND_KIND
    }

    fn serialize_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(TransformPayload {
            id: self.target.id().clone(),
            transform: self.transform,
            target_z_index: self.target_z_index,
            orig_z_index: self.orig_z_index,
        })?)
    }
}

/// Command factories available on every component
pub trait ComponentCommands {
    /// A command that transforms this component by `transform`. The component
    /// itself is not modified until the command is applied.
    fn transform_by(&self, transform: Mat33) -> TransformComponent;

    /// A command that moves this component to `z_index`
    fn set_z_index(&self, z_index: i64) -> TransformComponent;
}

impl<T: Component + ?Sized> ComponentCommands for T {
    fn transform_by(&self, transform: Mat33) -> TransformComponent {
        TransformComponent::new(self, transform)
    }

    fn set_z_index(&self, z_index: i64) -> TransformComponent {
        TransformComponent::with_z_index(self, Mat33::IDENTITY, z_index)
    }
}
