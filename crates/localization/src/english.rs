//! English (default) table

use doc_model::ComponentLocalization;
use edit_engine::EditorLocalization;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl ComponentLocalization for English {
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

impl EditorLocalization for English {
    fn transformed_elements(&self, count: usize) -> String {
        format!("Transformed {count} element{}", plural(count))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plurals() {
        assert_eq!(English.transformed_elements(1), "Transformed 1 element");
        assert_eq!(English.transformed_elements(3), "Transformed 3 elements");
    }
}
