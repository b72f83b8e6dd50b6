//! Spanish table (partial, English for the rest)

use crate::English;
use doc_model::ComponentLocalization;
use edit_engine::EditorLocalization;

#[derive(Debug, Clone, Copy, Default)]
pub struct Spanish;

impl ComponentLocalization for Spanish {
    fn stroke(&self) -> String {
        English.stroke()
    }

    fn shape(&self, kind: &str) -> String {
        English.shape(kind)
    }

    fn text(&self, content: &str) -> String {
        English.text(content)
    }

    fn image_node(&self, label: &str) -> String {
        English.image_node(label)
    }

    fn unlabeled_image_node(&self) -> String {
        English.unlabeled_image_node()
    }

    fn background(&self, color: &str) -> String {
        English.background(color)
    }

    fn elements(&self) -> String {
        English.elements()
    }
}

impl EditorLocalization for Spanish {
    fn transformed_elements(&self, count: usize) -> String {
        English.transformed_elements(count)
    }

    fn added_element(&self, description: &str) -> String {
        English.added_element(description)
    }

    fn erased_elements(&self, description: &str, count: usize) -> String {
        English.erased_elements(description, count)
    }

    fn duplicated_elements(&self, description: &str, count: usize) -> String {
        English.duplicated_elements(description, count)
    }

    fn union_of(&self, description: &str, count: usize) -> String {
        English.union_of(description, count)
    }

    fn inverse_of(&self, description: &str) -> String {
        English.inverse_of(description)
    }

    fn undo_announcement(&self, description: &str) -> String {
        format!("{description} fue deshecho")
    }

    fn redo_announcement(&self, description: &str) -> String {
        format!("{description} fue rehecho")
    }
}
