mod common;

use common::{engine, stroke, stroke_points};
use doc_model::{Component, ComponentId, ComponentRegistry};
use edit_engine::{
    add_component, unite_commands, Command, ComponentCommands, DuplicateComponents, EditError,
    EditingEngine, EraseComponents, TransformComponent,
};
use geometry::{Mat33, Point2, Vec2};
use proptest::prelude::*;

fn add(
    engine: &mut EditingEngine,
    registry: &ComponentRegistry,
    points: &[(f64, f64)],
) -> ComponentId {
    let component = stroke(registry, points);
    let id = component.id().clone();
    engine.dispatch(Box::new(add_component(component))).unwrap();
    id
}

fn z_of(engine: &EditingEngine, id: &ComponentId) -> i64 {
    engine.document().lookup(id).unwrap().z_index()
}

#[test]
fn test_z_order_is_monotonic_across_undo() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();

    let a = add(&mut engine, &registry, &[(0.0, 0.0), (1.0, 1.0)]);
    let b = add(&mut engine, &registry, &[(0.0, 0.0), (1.0, 1.0)]);
    assert!(z_of(&engine, &b) > z_of(&engine, &a));

    engine.dispatch(Box::new(EraseComponents::new([a.clone()]))).unwrap();
    assert!(engine.document().lookup(&a).is_none());

    engine.undo().unwrap();
    assert!(z_of(&engine, &a) < z_of(&engine, &b));
    let order: Vec<&ComponentId> = engine.document().ids_by_z().collect();
    assert_eq!(order, vec![&a, &b]);

    // Components created after the undo still draw on top
    let c = add(&mut engine, &registry, &[(5.0, 5.0)]);
    assert!(z_of(&engine, &c) > z_of(&engine, &b));
}

#[test]
fn test_push_after_undo_discards_redo() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();

    let a = add(&mut engine, &registry, &[(0.0, 0.0)]);
    assert!(engine.undo().unwrap().is_some());
    let b = add(&mut engine, &registry, &[(3.0, 3.0)]);

    assert_eq!(engine.redo().unwrap(), None);
    assert!(!engine.document().contains(&a));
    assert!(engine.document().contains(&b));
}

#[test]
fn test_dangling_reference_leaves_everything_unchanged() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    add(&mut engine, &registry, &[(0.0, 0.0), (2.0, 0.0)]);
    let before = engine.save_document().unwrap();
    let undo_count = engine.undo_manager().undo_count();

    let command = TransformComponent::unresolved(
        ComponentId::from("missing-id"),
        Mat33::translation(Vec2::new(1.0, 1.0)),
        0,
        None,
    );
    let result = engine.dispatch(Box::new(command));

    assert!(matches!(result, Err(EditError::DanglingReference(id)) if id.as_str() == "missing-id"));
    assert_eq!(engine.save_document().unwrap(), before);
    assert_eq!(engine.undo_manager().undo_count(), undo_count);
}

#[test]
fn test_failed_undo_keeps_cursor() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    let a = add(&mut engine, &registry, &[(0.0, 0.0)]);

    // Remove the component behind the history's back
    let mut erase = EraseComponents::new([a.clone()]);
    engine.dispatch_without_history(&mut erase).unwrap();

    assert!(matches!(engine.undo(), Err(EditError::DanglingReference(_))));
    assert_eq!(engine.undo_manager().undo_count(), 1);
}

#[test]
fn test_transform_undo_redo() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    let a = add(&mut engine, &registry, &[(0.0, 0.0), (4.0, 0.0)]);

    let command = engine
        .document()
        .lookup(&a)
        .unwrap()
        .transform_by(Mat33::scaling_2d(2.0, Point2::ZERO));
    engine.dispatch(Box::new(command)).unwrap();
    assert_eq!(stroke_points(engine.document(), &a)[1], Point2::new(8.0, 0.0));

    assert_eq!(engine.undo().unwrap().as_deref(), Some("Undid Transformed 1 elements"));
    assert_eq!(stroke_points(engine.document(), &a)[1], Point2::new(4.0, 0.0));

    engine.redo().unwrap();
    assert_eq!(stroke_points(engine.document(), &a)[1], Point2::new(8.0, 0.0));
}

#[test]
fn test_singular_transform_is_not_recorded() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    let a = add(&mut engine, &registry, &[(0.0, 0.0), (4.0, 0.0)]);
    let before = engine.save_document().unwrap();

    let collapse = engine
        .document()
        .lookup(&a)
        .unwrap()
        .transform_by(Mat33::scaling_2d(0.0, Point2::ZERO));
    assert!(matches!(engine.dispatch(Box::new(collapse)), Err(EditError::Geometry(_))));
    assert_eq!(engine.save_document().unwrap(), before);
    assert_eq!(engine.undo_manager().undo_count(), 1);

    // The add below it can still be undone
    assert!(engine.undo().unwrap().is_some());
    assert!(engine.document().is_empty());
}

#[test]
fn test_duplicate_then_undo() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    let a = add(&mut engine, &registry, &[(0.0, 0.0), (4.0, 0.0)]);

    let command = DuplicateComponents::new(engine.document(), &registry, [a.clone()]).unwrap();
    let copy = command.clone_ids().next().unwrap().clone();
    engine.dispatch(Box::new(command)).unwrap();

    assert_eq!(stroke_points(engine.document(), &copy), stroke_points(engine.document(), &a));
    assert_eq!(engine.undo().unwrap().as_deref(), Some("Undid Duplicated 1 Stroke"));
    assert!(!engine.document().contains(&copy));
}

#[test]
fn test_batch_is_one_history_entry() {
    let mut engine = engine();
    let registry = ComponentRegistry::with_builtin_components();
    let a = add(&mut engine, &registry, &[(0.0, 0.0)]);
    let b = add(&mut engine, &registry, &[(9.0, 9.0)]);

    let parts: Vec<Box<dyn Command>> = [&a, &b]
        .into_iter()
        .map(|id| {
            let command = engine
                .document()
                .lookup(id)
                .unwrap()
                .transform_by(Mat33::translation(Vec2::new(1.0, 0.0)));
            Box::new(command) as Box<dyn Command>
        })
        .collect();
    engine.dispatch(Box::new(unite_commands(parts))).unwrap();
    assert_eq!(stroke_points(engine.document(), &b)[0], Point2::new(10.0, 9.0));

    engine.undo().unwrap();
    assert_eq!(stroke_points(engine.document(), &a)[0], Point2::new(0.0, 0.0));
    assert_eq!(stroke_points(engine.document(), &b)[0], Point2::new(9.0, 9.0));
}

#[derive(Debug, Clone)]
enum Op {
    Add(i32, i32),
    Translate(usize, i32, i32),
    Erase(usize),
    Duplicate(usize),
    SetZ(usize, i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50..50, -50..50).prop_map(|(x, y)| Op::Add(x, y)),
        (any::<usize>(), -20..20, -20..20).prop_map(|(i, dx, dy)| Op::Translate(i, dx, dy)),
        any::<usize>().prop_map(Op::Erase),
        any::<usize>().prop_map(Op::Duplicate),
        (any::<usize>(), -100i64..100).prop_map(|(i, z)| Op::SetZ(i, z)),
    ]
}

fn run(engine: &mut EditingEngine, registry: &ComponentRegistry, op: &Op) {
    let ids: Vec<ComponentId> = engine.document().ids_by_z().cloned().collect();
    let pick = |i: usize| ids.get(i % ids.len().max(1)).cloned();

    let command: Box<dyn Command> = match *op {
        Op::Add(x, y) => {
            let (x, y) = (f64::from(x), f64::from(y));
            Box::new(add_component(stroke(registry, &[(x, y), (x + 3.0, y)])))
        }
        Op::Translate(i, dx, dy) => {
            let Some(id) = pick(i) else { return };
            let offset = Vec2::new(f64::from(dx), f64::from(dy));
            let component = engine.document().lookup(&id).unwrap();
            Box::new(component.transform_by(Mat33::translation(offset)))
        }
        Op::Erase(i) => {
            let Some(id) = pick(i) else { return };
            Box::new(EraseComponents::new([id]))
        }
        Op::Duplicate(i) => {
            let Some(id) = pick(i) else { return };
            Box::new(DuplicateComponents::new(engine.document(), registry, [id]).unwrap())
        }
        Op::SetZ(i, z) => {
            let Some(id) = pick(i) else { return };
            Box::new(engine.document().lookup(&id).unwrap().set_z_index(z))
        }
    };
    engine.dispatch(command).unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Undoing everything restores the starting document; redoing everything
    // restores the edited one
    #[test]
    fn prop_undo_redo_inverse(ops in prop::collection::vec(op_strategy(), 1..12)) {
        let mut engine = engine();
        let registry = ComponentRegistry::with_builtin_components();
        add(&mut engine, &registry, &[(0.0, 0.0), (5.0, 5.0)]);
        add(&mut engine, &registry, &[(10.0, 0.0), (15.0, 5.0)]);
        let initial = engine.save_document().unwrap();
        let base_depth = engine.undo_manager().undo_count();

        for op in &ops {
            run(&mut engine, &registry, op);
        }
        let edited = engine.save_document().unwrap();

        while engine.undo_manager().undo_count() > base_depth {
            prop_assert!(engine.undo().unwrap().is_some());
        }
        prop_assert_eq!(engine.save_document().unwrap(), initial);

        while engine.redo().unwrap().is_some() {}
        prop_assert_eq!(engine.save_document().unwrap(), edited);
    }
}
