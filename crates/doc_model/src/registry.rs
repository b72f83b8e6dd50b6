//! Component kind registry
//!
//! Maps a component kind tag to the function that rebuilds a component of
//! that kind from its serialized payload. A kind must be registered before
//! any component of that kind can be constructed; registering it with `None`
//! allows construction but marks the kind as not deserializable.

use crate::{background, image, shape, stroke, text, Component, DocModelError, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Rebuilds a component from the `data` field of its envelope
pub type DeserializeCallback = fn(&Value, &ComponentRegistry) -> Result<Box<dyn Component>>;

/// Kind tag -> deserialization callback
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    callbacks: HashMap<String, Option<DeserializeCallback>>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("ComponentRegistry").field("kinds", &kinds).finish()
    }
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in component kind registered
    pub fn with_builtin_components() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_components();
        registry
    }

    pub fn register_builtin_components(&mut self) {
        self.register(stroke::STROKE_KIND, Some(stroke::Stroke::deserialize_payload));
        self.register(shape::SHAPE_KIND, Some(shape::Shape::deserialize_payload));
        self.register(text::TEXT_KIND, Some(text::TextComponent::deserialize_payload));
        self.register(image::IMAGE_KIND, Some(image::ImageComponent::deserialize_payload));
        self.register(
            background::BACKGROUND_KIND,
            Some(background::Background::deserialize_payload),
        );
    }

    /// Register `kind`. Registering a kind again replaces the earlier entry.
    pub fn register(&mut self, kind: impl Into<String>, deserialize: Option<DeserializeCallback>) {
        let kind = kind.into();
        debug!(kind = %kind, deserializable = deserialize.is_some(), "registering component kind");
        self.callbacks.insert(kind, deserialize);
    }

    /// Remove `kind`, returning whether it was registered
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.callbacks.remove(kind).is_some()
    }

    /// Forget every registered kind
    pub fn reset(&mut self) {
        self.callbacks.clear();
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.callbacks.contains_key(kind)
    }

    pub fn is_deserializable(&self, kind: &str) -> bool {
        matches!(self.callbacks.get(kind), Some(Some(_)))
    }

    /// Fails with `UnregisteredKind` unless `kind` has been registered
    pub fn ensure_registered(&self, kind: &str) -> Result<()> {
        if self.is_registered(kind) {
            Ok(())
        } else {
            Err(DocModelError::UnregisteredKind(kind.to_string()))
        }
    }

    /// Run the deserialization callback registered for `kind`
    pub fn deserialize(&self, kind: &str, payload: &Value) -> Result<Box<dyn Component>> {
        match self.callbacks.get(kind) {
            Some(Some(callback)) => callback(payload, self),
            Some(None) => Err(DocModelError::NotDeserializable(format!(
                "kind `{kind}` is registered as not deserializable"
            ))),
            None => Err(DocModelError::NotDeserializable(format!(
                "kind `{kind}` is not registered"
            ))),
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::Point2;
    use serde_json::json;

    fn failing_callback(_: &Value, _: &ComponentRegistry) -> Result<Box<dyn Component>> {
        Err(DocModelError::NotDeserializable("always fails".into()))
    }

    #[test]
    fn test_builtin_kinds_are_registered() {
        let registry = ComponentRegistry::with_builtin_components();
        for kind in ["stroke", "shape", "text", "image", "background"] {
            assert!(registry.is_registered(kind), "{kind} missing");
            assert!(registry.is_deserializable(kind));
        }
    }

    #[test]
    fn test_null_registration_is_not_deserializable() {
        let mut registry = ComponentRegistry::new();
        registry.register("scratch", None);

        assert!(registry.is_registered("scratch"));
        assert!(registry.ensure_registered("scratch").is_ok());
        let err = registry.deserialize("scratch", &json!({})).unwrap_err();
        assert!(matches!(err, DocModelError::NotDeserializable(_)));
    }

    #[test]
    fn test_unknown_kind_is_not_deserializable() {
        let registry = ComponentRegistry::new();
        let err = registry.deserialize("nope", &json!({})).unwrap_err();
        assert!(matches!(err, DocModelError::NotDeserializable(_)));
        assert!(matches!(
            registry.ensure_registered("nope"),
            Err(DocModelError::UnregisteredKind(_))
        ));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = ComponentRegistry::with_builtin_components();
        let stroke = stroke::Stroke::new(
            &registry,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
            Default::default(),
        )
        .unwrap();
        let payload = stroke.serialize_payload().unwrap();
        assert!(registry.deserialize("stroke", &payload).is_ok());

        registry.register("stroke", Some(failing_callback));
        assert!(registry.deserialize("stroke", &payload).is_err());
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut registry = ComponentRegistry::with_builtin_components();
        registry.reset();
        assert_eq!(registry.kinds().count(), 0);
        assert!(!registry.unregister("stroke"));
    }
}
