use doc_model::{Component, ComponentRegistry, Stroke, StrokeStyle};
use edit_engine::{add_component, EditingEngine, EngineSettings};
use geometry::Point2;

fn stroke(registry: &ComponentRegistry) -> Box<Stroke> {
    let points = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)];
    Box::new(Stroke::new(registry, points, StrokeStyle::default()).unwrap())
}

#[test]
fn test_engine_uses_configured_language() {
    let mut settings = EngineSettings::default();
    settings.general.language = "es".to_string();
    let table = localization::for_language(&settings.general.language);
    let mut engine = EditingEngine::with_settings(settings, table);

    let registry = ComponentRegistry::with_builtin_components();
    engine.dispatch(Box::new(add_component(stroke(&registry)))).unwrap();

    assert_eq!(engine.undo().unwrap().as_deref(), Some("Added Stroke fue deshecho"));
    assert_eq!(engine.redo().unwrap().as_deref(), Some("Added Stroke fue rehecho"));
}

#[test]
fn test_english_descriptions_of_mixed_selection() {
    let mut engine = EditingEngine::new(localization::for_language("en"));
    let registry = ComponentRegistry::with_builtin_components();
    let background = doc_model::Background::new(
        &registry,
        "#ffffff",
        geometry::Rect2::new(0.0, 0.0, 10.0, 10.0),
    )
    .unwrap();
    let ids = vec![background.id().clone()];
    engine.dispatch(Box::new(add_component(Box::new(background)))).unwrap();
    engine.dispatch(Box::new(add_component(stroke(&registry)))).unwrap();

    let mut all: Vec<_> = engine.document().ids_by_z().cloned().collect();
    assert_eq!(all[0], ids[0]);
    all.reverse();

    let erase = edit_engine::EraseComponents::new(all);
    assert_eq!(engine.describe(&erase), "Erased 2 Elements");
}
