//! Formatting table for command descriptions
//!
//! Commands hand their parameters (counts, component descriptions) to an
//! [`EditorLocalization`] and never build user-facing strings themselves.

use doc_model::{Component, ComponentLocalization};

/// Lets a `&dyn EditorLocalization` be passed where components expect a
/// `&dyn ComponentLocalization`
pub trait AsComponentLocalization {
    fn as_component_localization(&self) -> &dyn ComponentLocalization;
}

impl<T: ComponentLocalization> AsComponentLocalization for T {
    fn as_component_localization(&self) -> &dyn ComponentLocalization {
        self
    }
}

pub trait EditorLocalization: ComponentLocalization + AsComponentLocalization {
    fn transformed_elements(&self, count: usize) -> String;
    fn added_element(&self, description: &str) -> String;
    fn erased_elements(&self, description: &str, count: usize) -> String;
    fn duplicated_elements(&self, description: &str, count: usize) -> String;
    fn union_of(&self, description: &str, count: usize) -> String;
    fn inverse_of(&self, description: &str) -> String;

    /// Read out after a command is undone
    fn undo_announcement(&self, description: &str) -> String;
    /// Read out after a command is redone
    fn redo_announcement(&self, description: &str) -> String;
}

/// Describe a group of components: their shared description when they all
/// agree, the generic "elements" string otherwise
pub fn describe_components<'a, I>(components: I, localization: &dyn EditorLocalization) -> String
where
    I: IntoIterator<Item = &'a dyn Component>,
{
    let table = localization.as_component_localization();
    let mut shared: Option<String> = None;
    for component in components {
        let description = component.description(table);
        match &shared {
            None => shared = Some(description),
            Some(existing) if *existing == description => {}
            Some(_) => return localization.elements(),
        }
    }
    shared.unwrap_or_else(|| localization.elements())
}
