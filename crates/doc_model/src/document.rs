//! The document: the set of components in one editable scene
//!
//! A document owns its components (`Box<dyn Component>`), so a component is a
//! member of at most one document at a time. Three indices are kept in sync
//! with the component map: identity lookup, a uniform-grid spatial index and
//! the z-ordered draw list.

use crate::component::deserialize_component;
use crate::{
    Component, ComponentEnvelope, ComponentId, ComponentRegistry, DocModelError, Result,
    SpatialIndex,
};
use geometry::Rect2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

/// Identity of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position in the draw list. Backgrounds draw below every foreground
/// component regardless of z-index; ties are broken by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DrawKey {
    layer: u8,
    z_index: i64,
    id: ComponentId,
}

impl DrawKey {
    fn of(component: &dyn Component) -> Self {
        Self {
            layer: if component.is_background() { 0 } else { 1 },
            z_index: component.z_index(),
            id: component.id().clone(),
        }
    }
}

#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    components: HashMap<ComponentId, Box<dyn Component>>,
    draw_order: BTreeSet<DrawKey>,
    spatial: SpatialIndex,
    rerender_requests: u64,
    /// Version counter for tracking changes
    version: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_cell_size(SpatialIndex::DEFAULT_CELL_SIZE)
    }

    /// Create an empty document whose spatial index uses `cell_size` cells
    pub fn with_cell_size(cell_size: f64) -> Self {
        Self {
            id: DocumentId::new(),
            components: HashMap::new(),
            draw_order: BTreeSet::new(),
            spatial: SpatialIndex::new(cell_size),
            rerender_requests: 0,
            version: 0,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Look up a component by identity
    pub fn lookup(&self, id: &ComponentId) -> Option<&dyn Component> {
        self.components.get(id).map(|c| c.as_ref())
    }

    /// This document's id if it owns `id`
    pub fn owner_of(&self, id: &ComponentId) -> Option<&DocumentId> {
        self.contains(id).then_some(&self.id)
    }

    /// Add a component, calling its `on_add_to_document` hook.
    ///
    /// Fails with [`DocModelError::AlreadyInDocument`] (dropping `component`)
    /// if the id is already present; callers that need to keep the component
    /// check [`Document::contains`] first.
    pub fn insert(&mut self, mut component: Box<dyn Component>) -> Result<()> {
        let id = component.id().clone();
        if self.components.contains_key(&id) {
            return Err(DocModelError::AlreadyInDocument(id));
        }

        component.on_add_to_document();
        self.draw_order.insert(DrawKey::of(component.as_ref()));
        self.spatial.insert(id.clone(), component.bbox());
        debug!(
            component = %id,
            kind = component.kind(),
            z_index = component.z_index(),
            "Component added to document"
        );
        self.components.insert(id, component);
        self.version += 1;
        Ok(())
    }

    /// Detach a component and hand it back to the caller
    pub fn remove(&mut self, id: &ComponentId) -> Result<Box<dyn Component>> {
        let mut component = self
            .components
            .remove(id)
            .ok_or_else(|| DocModelError::ComponentNotFound(id.clone()))?;

        self.draw_order.remove(&DrawKey::of(component.as_ref()));
        self.spatial.remove(id);
        component.on_remove_from_document();
        debug!(component = %id, kind = component.kind(), "Component removed from document");
        self.version += 1;
        Ok(component)
    }

    /// All components, bottom to top
    pub fn components_by_z(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.draw_order
            .iter()
            .filter_map(|key| self.components.get(&key.id))
            .map(|c| c.as_ref())
    }

    /// Ids bottom to top
    pub fn ids_by_z(&self) -> impl Iterator<Item = &ComponentId> + '_ {
        self.draw_order.iter().map(|key| &key.id)
    }

    /// Components whose bounding boxes intersect `region`, bottom to top.
    ///
    /// Reverse the result to hit-test topmost first.
    pub fn query(&self, region: &Rect2) -> Vec<&dyn Component> {
        by_draw_order(
            self.spatial
                .candidates(region)
                .iter()
                .filter_map(|id| self.components.get(id))
                .map(|c| c.as_ref())
                .filter(|c| c.bbox().intersects(region)),
        )
    }

    /// Like [`Document::query`], keeping only components whose geometry
    /// touches `region`
    pub fn query_intersecting(&self, region: &Rect2) -> Vec<&dyn Component> {
        self.query(region)
            .into_iter()
            .filter(|c| c.intersects_rect(region))
            .collect()
    }

    /// Selectable components whose geometry touches `region`, bottom to top
    pub fn query_selectable(&self, region: &Rect2) -> Vec<&dyn Component> {
        self.query_intersecting(region)
            .into_iter()
            .filter(|c| c.is_selectable())
            .collect()
    }

    /// Union of all bounding boxes
    pub fn bbox(&self) -> Rect2 {
        Rect2::union_all(self.components.values().map(|c| c.bbox()))
    }

    /// Ask the renderer to redraw
    pub fn queue_rerender(&mut self) {
        self.rerender_requests += 1;
    }

    /// Number of redraws requested since the last call
    pub fn take_rerender_requests(&mut self) -> u64 {
        std::mem::take(&mut self.rerender_requests)
    }

    /// Envelopes for every component, bottom to top
    pub fn to_envelopes(&self) -> Result<Vec<ComponentEnvelope>> {
        self.components_by_z().map(|c| c.serialize()).collect()
    }

    /// Deserialize `envelopes` and add the components.
    ///
    /// Every envelope is decoded before anything is inserted, so a bad
    /// envelope leaves the document untouched.
    pub fn load_envelopes(
        &mut self,
        registry: &ComponentRegistry,
        envelopes: &[ComponentEnvelope],
    ) -> Result<usize> {
        let mut loaded = Vec::with_capacity(envelopes.len());
        let mut seen = std::collections::HashSet::new();
        for envelope in envelopes {
            if self.contains(&envelope.id) || !seen.insert(envelope.id.clone()) {
                return Err(DocModelError::AlreadyInDocument(envelope.id.clone()));
            }
            loaded.push(deserialize_component(registry, envelope)?);
        }

        let count = loaded.len();
        for component in loaded {
            self.insert(component)?;
        }
        debug!(document = %self.id, count, "Loaded components");
        Ok(count)
    }

    /// Remove every component
    pub fn clear(&mut self) {
        let ids: Vec<ComponentId> = self.components.keys().cloned().collect();
        for id in ids {
            if let Some(mut component) = self.components.remove(&id) {
                component.on_remove_from_document();
            }
        }
        self.draw_order.clear();
        self.spatial.clear();
        self.version += 1;
    }
}

fn by_draw_order<'a>(found: impl Iterator<Item = &'a dyn Component>) -> Vec<&'a dyn Component> {
    let mut found: Vec<_> = found.collect();
    found.sort_by_cached_key(|c| DrawKey::of(*c));
    found
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// The document in `documents` that owns `id`, if any
pub fn find_owner_of<'a, I>(documents: I, id: &ComponentId) -> Option<&'a Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    documents.into_iter().find(|doc| doc.contains(id))
}
