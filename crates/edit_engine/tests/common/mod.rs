//! Shared fixtures for the integration tests

#![allow(dead_code)]

use doc_model::{
    Component, ComponentId, ComponentLocalization, ComponentRegistry, Document, Stroke,
    StrokeStyle,
};
use edit_engine::{EditingEngine, EditorLocalization};
use geometry::Point2;

/// Route engine logs to the test output (set RUST_LOG to see them)
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Strings;

impl ComponentLocalization for Strings {
    fn stroke(&self) -> String {
        "Stroke".to_string()
    }

    fn shape(&self, kind: &str) -> String {
        format!("Shape ({kind})")
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
        format!("Filled background ({color})")
    }

    fn elements(&self) -> String {
        "Elements".to_string()
    }
}

impl EditorLocalization for Strings {
    fn transformed_elements(&self, count: usize) -> String {
        format!("Transformed {count} elements")
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

pub fn engine() -> EditingEngine {
    init_logging();
    EditingEngine::new(Box::new(Strings))
}

pub fn stroke(registry: &ComponentRegistry, points: &[(f64, f64)]) -> Box<dyn Component> {
    let points = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();
    Box::new(Stroke::new(registry, points, StrokeStyle::default()).unwrap())
}

pub fn stroke_points(document: &Document, id: &ComponentId) -> Vec<Point2> {
    document
        .lookup(id)
        .and_then(|c| c.as_any().downcast_ref::<Stroke>())
        .map(|s| s.points().to_vec())
        .unwrap()
}
