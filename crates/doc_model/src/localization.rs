//! Formatting hooks used by components to describe themselves
//!
//! Components never produce user-facing text directly. They pass their
//! parameters to a table supplied by the embedding application.

/// Strings needed to describe components (e.g. for screen readers)
pub trait ComponentLocalization {
    fn stroke(&self) -> String;
    fn shape(&self, kind: &str) -> String;
    fn text(&self, content: &str) -> String;
    fn image_node(&self, label: &str) -> String;
    fn unlabeled_image_node(&self) -> String;
    fn background(&self, color: &str) -> String;

    /// Used when a group of components has no single common description
    fn elements(&self) -> String;
}
