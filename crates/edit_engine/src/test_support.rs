//! Fixtures shared by the unit tests

use crate::EditorLocalization;
use doc_model::{
    Component, ComponentId, ComponentLocalization, ComponentRegistry, Document, Stroke, StrokeStyle,
};
use geometry::Point2;

/// English strings without plural handling beyond what the tests check
pub struct TestLocalization;

impl ComponentLocalization for TestLocalization {
    fn stroke(&self) -> String {
        "Stroke".to_string()
    }

    fn shape(&self, kind: &str) -> String {
        format!("Shape: {kind}")
    }

    fn text(&self, content: &str) -> String {
        format!("Text object: {content}")
    }

    fn image_node(&self, label: &str) -> String {
        format!("Image: {label}")
    }

    fn unlabeled_image_node(&self) -> String {
        "Unlabeled image".to_string()
    }

    fn background(&self, color: &str) -> String {
        format!("Background ({color})")
    }

    fn elements(&self) -> String {
        "Elements".to_string()
    }
}

impl EditorLocalization for TestLocalization {
    fn transformed_elements(&self, count: usize) -> String {
        let plural = if count == 1 { "" } else { "s" };
        format!("Transformed {count} element{plural}")
    }

    fn added_element(&self, description: &str) -> String {
        format!("Added {description}")
    }

    fn erased_elements(&self, description: &str, count: usize) -> String {
        format!("Erased {count} {description}")
    }

    fn duplicated_elements(&self, description: &str, count: usize) -> String {
        format!("Duplicated {count} {description}")
    }

    fn union_of(&self, description: &str, count: usize) -> String {
        format!("Union: {count} {description}")
    }

    fn inverse_of(&self, description: &str) -> String {
        format!("Inverse of {description}")
    }

    fn undo_announcement(&self, description: &str) -> String {
        format!("Undid {description}")
    }

    fn redo_announcement(&self, description: &str) -> String {
        format!("Redid {description}")
    }
}

pub fn new_stroke(x: f64, y: f64) -> Box<dyn Component> {
    let registry = ComponentRegistry::with_builtin_components();
    let points = vec![Point2::new(x, y), Point2::new(x + 10.0, y + 10.0)];
    Box::new(Stroke::new(&registry, points, StrokeStyle::default()).unwrap())
}

/// Insert a new stroke starting at (x, y) and return its id
pub fn stroke_in(document: &mut Document, x: f64, y: f64) -> ComponentId {
    let stroke = new_stroke(x, y);
    let id = stroke.id().clone();
    document.insert(stroke).unwrap();
    id
}
