//! The component trait and state shared by every component
//!
//! A component is anything that can be placed in a [`Document`](crate::Document).
//! Variants own their geometry and implement the [`Component`] capability
//! trait; identity, z-index, timestamps and load/save data live in a
//! [`ComponentBase`] that every variant embeds.

use crate::{
    clamp_z_index, next_z_index, reserve_z_index, ComponentId, ComponentLocalization,
    ComponentRegistry, DocModelError, LoadSaveData, LoadSaveTable, Result,
};
use chrono::Utc;
use geometry::{LineSegment2, Mat33, Point2, Rect2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;

// =============================================================================
// Shared state
// =============================================================================

/// Identity, ordering and bookkeeping common to all components
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBase {
    kind: String,
    id: ComponentId,
    z_index: i64,
    /// Milliseconds since the epoch at which the component last changed
    last_changed: i64,
    load_save_data: LoadSaveData,
}

impl ComponentBase {
    /// Create the base for a new component of `kind` with a fresh id and the
    /// next topmost z-index. Fails if `kind` has not been registered.
    pub fn new(registry: &ComponentRegistry, kind: &str) -> Result<Self> {
        registry.ensure_registered(kind)?;
        Ok(Self {
            kind: kind.to_string(),
            id: ComponentId::new(),
            z_index: next_z_index(),
            last_changed: Utc::now().timestamp_millis(),
            load_save_data: LoadSaveData::new(),
        })
    }

    /// Like [`ComponentBase::new`], with an explicit z-index
    pub fn with_z_index(registry: &ComponentRegistry, kind: &str, z_index: i64) -> Result<Self> {
        let mut base = Self::new(registry, kind)?;
        base.z_index = z_index;
        Ok(base)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    pub fn last_changed(&self) -> i64 {
        self.last_changed
    }

    /// Record that the component changed just now
    pub fn touch(&mut self) {
        self.last_changed = Utc::now().timestamp_millis();
    }

    pub fn load_save_data(&self) -> &LoadSaveData {
        &self.load_save_data
    }

    pub fn load_save_data_mut(&mut self) -> &mut LoadSaveData {
        &mut self.load_save_data
    }

    /// Overwrite the identity fields with values read from an envelope
    fn restore(&mut self, envelope: &ComponentEnvelope) {
        self.id = envelope.id.clone();
        self.z_index = clamp_z_index(envelope.z_index);
        self.load_save_data = LoadSaveData::from_deserialized(envelope.side_channel.clone());
        reserve_z_index(self.z_index);
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Serialized form of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEnvelope {
    pub kind: String,
    pub z_index: i64,
    pub id: ComponentId,
    #[serde(default)]
    pub side_channel: LoadSaveTable,
    #[serde(default)]
    pub data: Value,
}

impl ComponentEnvelope {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse an envelope, reporting any shape error as `NotDeserializable`
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DocModelError::NotDeserializable(
                "component envelope must be an object".to_string(),
            ));
        }
        Self::deserialize(value)
            .map_err(|e| DocModelError::NotDeserializable(format!("malformed envelope: {e}")))
    }
}

// =============================================================================
// Capability trait
// =============================================================================

/// Capabilities every drawable component provides
pub trait Component: fmt::Debug + Send + Sync {
    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    /// The tightest box known to enclose this component's geometry
    fn content_bbox(&self) -> Rect2;

    /// A point that lies on the component's geometry
    fn point_on_geometry(&self) -> Point2;

    /// Exact test of whether `segment` touches this component
    fn intersects(&self, segment: &LineSegment2) -> bool;

    /// Transform all points of this component in place.
    ///
    /// Document membership is indexed by bounding box, so callers must detach
    /// the component from its document first. Commands do this for you.
    fn apply_transformation(&mut self, transform: &Mat33);

    /// Variant-specific payload, or `None` if this component must not be
    /// serialized
    fn serialize_payload(&self) -> Option<Value>;

    /// Construct a copy of the geometry with a fresh identity
    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>>;

    /// Describe this component, e.g. for screen readers
    fn description(&self, localization: &dyn ComponentLocalization) -> String;

    fn as_any(&self) -> &dyn Any;

    fn id(&self) -> &ComponentId {
        self.base().id()
    }

    fn kind(&self) -> &str {
        self.base().kind()
    }

    fn z_index(&self) -> i64 {
        self.base().z_index()
    }

    fn last_changed(&self) -> i64 {
        self.base().last_changed()
    }

    fn bbox(&self) -> Rect2 {
        self.content_bbox()
    }

    /// True if this component is inside `rect` or touches one of its edges.
    ///
    /// Bounding boxes can be loose, so besides the outer edges every edge of a
    /// 2x2 subdivision of `rect` is tested. Geometry entirely inside `rect` is
    /// caught by the containment checks, so this never misses a component that
    /// really intersects `rect`.
    fn intersects_rect(&self, rect: &Rect2) -> bool {
        subdivided_rect_intersects(self, rect)
    }

    fn is_selectable(&self) -> bool {
        true
    }

    fn is_background(&self) -> bool {
        false
    }

    /// Rough relative cost of rendering this component
    fn proportional_rendering_time(&self) -> f64 {
        1.0
    }

    fn on_add_to_document(&mut self) {}

    fn on_remove_from_document(&mut self) {}

    fn attach_load_save_data(&mut self, key: &str, value: Value) {
        self.base_mut().load_save_data_mut().attach(key, value);
    }

    fn load_save_data(&self) -> &LoadSaveData {
        self.base().load_save_data()
    }

    /// A deep copy with a fresh identity, including load/save data
    fn clone_component(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        let mut clone = self.create_clone(registry)?;
        clone
            .base_mut()
            .load_save_data_mut()
            .extend_from(self.load_save_data());
        Ok(clone)
    }

    /// Build the envelope for this component
    fn serialize(&self) -> Result<ComponentEnvelope> {
        let data = self
            .serialize_payload()
            .filter(|data| !data.is_null())
            .ok_or_else(|| DocModelError::SerializationRefused(self.kind().to_string()))?;

        Ok(ComponentEnvelope {
            kind: self.kind().to_string(),
            z_index: self.z_index(),
            id: self.id().clone(),
            side_channel: self.load_save_data().entries().clone(),
            data,
        })
    }
}

/// Rebuild a component from its envelope.
///
/// The registered callback constructs the component; its id and z-index are
/// then replaced with the ones stored in the envelope and the side-channel
/// table is restored, marked as untrusted.
pub fn deserialize_component(
    registry: &ComponentRegistry,
    envelope: &ComponentEnvelope,
) -> Result<Box<dyn Component>> {
    if envelope.data.is_null() {
        return Err(DocModelError::NotDeserializable(format!(
            "envelope for {} has no data",
            envelope.id
        )));
    }

    let mut component = registry.deserialize(&envelope.kind, &envelope.data)?;
    component.base_mut().restore(envelope);
    Ok(component)
}

/// Parse an envelope from JSON text and rebuild the component
pub fn deserialize_component_str(
    registry: &ComponentRegistry,
    json: &str,
) -> Result<Box<dyn Component>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| DocModelError::NotDeserializable(format!("invalid JSON: {e}")))?;
    deserialize_component(registry, &ComponentEnvelope::from_value(&value)?)
}

/// Parse a variant payload, reporting failures as `NotDeserializable`
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(kind: &str, data: &Value) -> Result<T> {
    T::deserialize(data)
        .map_err(|e| DocModelError::NotDeserializable(format!("invalid {kind} payload: {e}")))
}

/// Default rectangle test shared by [`Component::intersects_rect`] and the
/// variants that narrow it
pub(crate) fn subdivided_rect_intersects(
    component: &(impl Component + ?Sized),
    rect: &Rect2,
) -> bool {
    if rect.contains_rect(&component.bbox()) || rect.contains_point(component.point_on_geometry()) {
        return true;
    }

    rect.divide_into_grid(2, 2)
        .iter()
        .flat_map(Rect2::edges)
        .any(|edge| component.intersects(&edge))
}

/// Segment test against a filled rectangle placed by `transform`
pub(crate) fn transformed_rect_intersects(
    local: &Rect2,
    transform: &Mat33,
    segment: &LineSegment2,
) -> bool {
    let [a, b, c, d] = local.corners().map(|p| transform.transform_point(p));
    let outline = [
        LineSegment2::new(a, b),
        LineSegment2::new(b, c),
        LineSegment2::new(c, d),
        LineSegment2::new(d, a),
    ];
    if outline.iter().any(|edge| edge.intersects(segment)) {
        return true;
    }

    // No edge crossing: the segment is either fully inside or fully outside
    match transform.inverse() {
        Ok(inverse) => local.contains_point(inverse.transform_point(segment.point1)),
        Err(_) => false,
    }
}
