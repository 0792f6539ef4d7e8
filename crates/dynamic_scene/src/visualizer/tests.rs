//! Reconciliation scenarios for the polyline visualizer

use super::*;
use crate::config::{PolylineDefaults, RemovalPolicy, VisualizerConfig};
use crate::foundation::math::{Cartesian3, Color};
use crate::foundation::time::JulianDate;
use crate::property::{ConstantPositions, ConstantProperty, SampledPositions, TimeInterval, TimeIntervalProperty};
use crate::render::{Polyline, PrimitiveCollection, PrimitiveRegistry, SharedRegistry};
use crate::scene::{DynamicObjectCollection, DynamicObjectRef, DynamicPolyline, EntityId};
use approx::assert_relative_eq;
use std::sync::Arc;

type Visualizer = DynamicPolylineVisualizer<PrimitiveCollection>;

fn positions_a() -> Vec<Cartesian3> {
    vec![
        Cartesian3::new(1234.0, 5678.0, 9_101_112.0),
        Cartesian3::new(5678.0, 1234.0, 1_101_112.0),
    ]
}

fn positions_b() -> Vec<Cartesian3> {
    vec![
        Cartesian3::new(5678.0, 1234.0, 1_101_112.0),
        Cartesian3::new(1234.0, 5678.0, 9_101_112.0),
    ]
}

fn add_visible_polyline(collection: &DynamicObjectCollection, id: &str) -> DynamicObjectRef {
    let object = collection.get_or_create_object(id);
    {
        let mut object = object.write().unwrap();
        object.vertex_positions = Some(Arc::new(ConstantPositions::new(positions_a())));
        object.polyline = Some(DynamicPolyline {
            show: Some(Arc::new(ConstantProperty::new(true))),
            ..DynamicPolyline::new()
        });
    }
    object
}

fn primitive_len(scene: &SharedRegistry<PrimitiveCollection>) -> usize {
    scene.lock().unwrap().len()
}

fn primitive_at(scene: &SharedRegistry<PrimitiveCollection>, index: usize) -> Polyline {
    let scene = scene.lock().unwrap();
    let handle = scene.get(index).expect("no primitive at index");
    scene.polyline(handle).unwrap().clone()
}

fn set_show(object: &DynamicObjectRef, show: bool) {
    let mut object = object.write().unwrap();
    object.polyline.as_mut().unwrap().show = Some(Arc::new(ConstantProperty::new(show)));
}

#[test]
fn test_constructor_requires_scene() {
    let result = Visualizer::new(None, DynamicObjectCollection::new());
    assert!(matches!(result, Err(VisualizerError::InvalidArgument("scene"))));
}

#[test]
fn test_constructor_sets_expected_parameters() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    assert!(Arc::ptr_eq(visualizer.scene(), &scene));
    assert_eq!(visualizer.dynamic_object_collection(), Some(&collection));
    assert_eq!(collection.listener_count(), 1);
    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_update_requires_time() {
    let mut visualizer = Visualizer::new(PrimitiveCollection::shared(), DynamicObjectCollection::new()).unwrap();
    assert_eq!(visualizer.update(None), Err(VisualizerError::InvalidArgument("time")));
}

#[test]
fn test_update_without_collection_does_nothing() {
    let scene = PrimitiveCollection::shared();
    let mut visualizer = Visualizer::new(scene.clone(), None).unwrap();

    visualizer.update(JulianDate::j2000()).unwrap();

    assert!(visualizer.dynamic_object_collection().is_none());
    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_is_destroyed_false_until_destroyed() {
    let mut visualizer = Visualizer::new(PrimitiveCollection::shared(), None).unwrap();
    assert!(!visualizer.is_destroyed());
    visualizer.destroy().unwrap();
    assert!(visualizer.is_destroyed());
}

#[test]
fn test_use_after_destroy() {
    let mut visualizer = Visualizer::new(PrimitiveCollection::shared(), DynamicObjectCollection::new()).unwrap();
    visualizer.destroy().unwrap();

    assert_eq!(visualizer.update(JulianDate::j2000()), Err(VisualizerError::UseAfterDestroy));
    assert_eq!(
        visualizer.set_dynamic_object_collection(DynamicObjectCollection::new()),
        Err(VisualizerError::UseAfterDestroy)
    );
    assert_eq!(visualizer.destroy(), Err(VisualizerError::UseAfterDestroy));
}

#[test]
fn test_object_without_polyline_creates_nothing() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = collection.get_or_create_object("test");
    object.write().unwrap().vertex_positions = Some(Arc::new(ConstantPositions::new(positions_a())));
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_object_without_positions_creates_nothing() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = collection.get_or_create_object("test");
    object.write().unwrap().polyline = Some(DynamicPolyline {
        show: Some(Arc::new(ConstantProperty::new(true))),
        ..DynamicPolyline::new()
    });
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_empty_positions_create_nothing() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    object.write().unwrap().vertex_positions = Some(Arc::new(ConstantPositions::new(Vec::new())));
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_positions_vanishing_hides_existing_primitive() {
    let start = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    object.write().unwrap().vertex_positions = Some(Arc::new(
        SampledPositions::new()
            .with_sample(start, positions_a())
            .with_sample(start.add_seconds(10.0), positions_b()),
    ));

    visualizer.update(start.add_seconds(5.0)).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert!(primitive_at(&scene, 0).show());
    let handle = visualizer.primitive_for(&EntityId::from("test")).unwrap();

    // Past the last sample there are no positions
    visualizer.update(start.add_seconds(20.0)).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert!(!primitive_at(&scene, 0).show());

    object.write().unwrap().vertex_positions = None;
    visualizer.update(start.add_seconds(5.0)).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert!(!primitive_at(&scene, 0).show());
    assert_eq!(visualizer.primitive_for(&EntityId::from("test")), Some(handle));
}

#[test]
fn test_polyline_is_created_and_updated() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = collection.get_or_create_object("test");
    {
        let mut object = object.write().unwrap();
        object.vertex_positions = Some(Arc::new(ConstantPositions::new(positions_a())));
        object.polyline = Some(DynamicPolyline {
            show: Some(Arc::new(ConstantProperty::new(true))),
            color: Some(Arc::new(ConstantProperty::new(Color::new(0.8, 0.7, 0.6, 0.5)))),
            width: Some(Arc::new(ConstantProperty::new(12.5_f32))),
            outline_color: Some(Arc::new(ConstantProperty::new(Color::new(0.1, 0.2, 0.3, 0.4)))),
            outline_width: Some(Arc::new(ConstantProperty::new(2.5_f32))),
        });
    }

    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);

    let primitive = primitive_at(&scene, 0);
    assert!(primitive.show());
    assert_eq!(primitive.positions(), positions_a().as_slice());
    assert_relative_eq!(primitive.color(), Color::new(0.8, 0.7, 0.6, 0.5));
    assert_relative_eq!(primitive.outline_color(), Color::new(0.1, 0.2, 0.3, 0.4));
    assert_relative_eq!(primitive.width(), 12.5);
    assert_relative_eq!(primitive.outline_width(), 2.5);

    {
        let mut object = object.write().unwrap();
        object.vertex_positions = Some(Arc::new(ConstantPositions::new(positions_b())));
        let polyline = object.polyline.as_mut().unwrap();
        polyline.color = Some(Arc::new(ConstantProperty::new(Color::new(0.1, 0.2, 0.3, 0.4))));
        polyline.width = Some(Arc::new(ConstantProperty::new(2.5_f32)));
        polyline.outline_color = Some(Arc::new(ConstantProperty::new(Color::new(0.5, 0.6, 0.7, 0.8))));
        polyline.outline_width = Some(Arc::new(ConstantProperty::new(12.5_f32)));
    }

    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    let primitive = primitive_at(&scene, 0);
    assert!(primitive.show());
    assert_eq!(primitive.positions(), positions_b().as_slice());
    assert_relative_eq!(primitive.color(), Color::new(0.1, 0.2, 0.3, 0.4));
    assert_relative_eq!(primitive.outline_color(), Color::new(0.5, 0.6, 0.7, 0.8));
    assert_relative_eq!(primitive.width(), 2.5);
    assert_relative_eq!(primitive.outline_width(), 12.5);

    set_show(&object, false);
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert!(!primitive_at(&scene, 0).show());
}

#[test]
fn test_clear_releases_primitives() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    add_visible_polyline(&collection, "test");
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    let handle = visualizer.primitive_for(&EntityId::from("test")).unwrap();

    collection.clear();

    assert_eq!(primitive_len(&scene), 0);
    assert!(!scene.lock().unwrap().contains(handle));
    assert_eq!(visualizer.tracked_len(), 0);
}

#[test]
fn test_clear_hides_primitives_with_hide_policy() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let config = VisualizerConfig {
        removal_policy: RemovalPolicy::Hide,
        ..VisualizerConfig::default()
    };
    let mut visualizer = Visualizer::with_config(scene.clone(), collection.clone(), config).unwrap();

    add_visible_polyline(&collection, "test");
    visualizer.update(time).unwrap();
    let handle = visualizer.primitive_for(&EntityId::from("test")).unwrap();

    collection.clear();
    assert_eq!(primitive_len(&scene), 1);
    assert!(!primitive_at(&scene, 0).show());

    // The same id coming back reuses the pooled primitive
    add_visible_polyline(&collection, "test");
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(visualizer.primitive_for(&EntityId::from("test")), Some(handle));
    assert!(primitive_at(&scene, 0).show());
}

#[test]
fn test_remove_object_releases_immediately() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    add_visible_polyline(&collection, "a");
    add_visible_polyline(&collection, "b");
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 2);

    collection.remove_object(&EntityId::from("a"));

    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(primitive_at(&scene, 0).owner(), Some(&EntityId::from("b")));
}

#[test]
fn test_visualizer_sets_owner() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(primitive_at(&scene, 0).owner(), Some(object.read().unwrap().id()));
}

#[test]
fn test_set_collection_removes_old_objects_and_adds_new() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();

    let first = DynamicObjectCollection::new();
    add_visible_polyline(&first, "test");
    let second = DynamicObjectCollection::new();
    add_visible_polyline(&second, "test2");

    let mut visualizer = Visualizer::new(scene.clone(), first.clone()).unwrap();
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(primitive_at(&scene, 0).owner(), Some(&EntityId::from("test")));

    visualizer.set_dynamic_object_collection(second.clone()).unwrap();
    assert_eq!(primitive_len(&scene), 0);
    assert_eq!(first.listener_count(), 0);
    assert_eq!(second.listener_count(), 1);

    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(primitive_at(&scene, 0).owner(), Some(&EntityId::from("test2")));
}

#[test]
fn test_set_collection_keeps_shared_ids() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();

    let first = DynamicObjectCollection::new();
    add_visible_polyline(&first, "shared");
    add_visible_polyline(&first, "old");
    let second = DynamicObjectCollection::new();
    add_visible_polyline(&second, "shared");

    let mut visualizer = Visualizer::new(scene.clone(), first).unwrap();
    visualizer.update(time).unwrap();
    let handle = visualizer.primitive_for(&EntityId::from("shared")).unwrap();

    visualizer.set_dynamic_object_collection(second).unwrap();
    visualizer.update(time).unwrap();

    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(visualizer.primitive_for(&EntityId::from("shared")), Some(handle));
}

#[test]
fn test_detaching_collection_releases_everything() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    add_visible_polyline(&collection, "test");

    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();
    visualizer.update(JulianDate::j2000()).unwrap();
    visualizer.set_dynamic_object_collection(None).unwrap();

    assert_eq!(primitive_len(&scene), 0);
    assert_eq!(collection.listener_count(), 0);
    assert!(visualizer.dynamic_object_collection().is_none());
}

#[test]
fn test_inert_object_is_hidden_not_released() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    visualizer.update(time).unwrap();
    let handle = visualizer.primitive_for(&EntityId::from("test")).unwrap();

    let description = object.write().unwrap().polyline.take();
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert!(!primitive_at(&scene, 0).show());

    object.write().unwrap().polyline = description;
    visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(visualizer.primitive_for(&EntityId::from("test")), Some(handle));
    assert!(primitive_at(&scene, 0).show());
}

#[test]
fn test_missing_show_defaults_to_visible() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = collection.get_or_create_object("test");
    {
        let mut object = object.write().unwrap();
        object.vertex_positions = Some(Arc::new(ConstantPositions::new(positions_a())));
        object.polyline = Some(DynamicPolyline::new());
    }
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 1);
    assert!(primitive_at(&scene, 0).show());
}

#[test]
fn test_show_without_value_retains_prior_sample() {
    let start = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    let show = TimeIntervalProperty::new()
        .with_interval(TimeInterval::new(start, start.add_seconds(10.0)), true)
        .with_interval(TimeInterval::new(start.add_seconds(20.0), start.add_seconds(30.0)), false);
    object.write().unwrap().polyline.as_mut().unwrap().show = Some(Arc::new(show));

    visualizer.update(start.add_seconds(5.0)).unwrap();
    assert!(primitive_at(&scene, 0).show());

    // Between intervals the last sampled value (true) holds
    visualizer.update(start.add_seconds(15.0)).unwrap();
    assert!(primitive_at(&scene, 0).show());

    visualizer.update(start.add_seconds(25.0)).unwrap();
    assert!(!primitive_at(&scene, 0).show());

    // Past the end the last sampled value (false) holds
    visualizer.update(start.add_seconds(35.0)).unwrap();
    assert!(!primitive_at(&scene, 0).show());
    assert_eq!(primitive_len(&scene), 1);
}

#[test]
fn test_hidden_on_first_sight_creates_nothing() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    set_show(&object, false);
    visualizer.update(JulianDate::j2000()).unwrap();

    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_field_without_value_keeps_prior_value() {
    let start = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    let object = add_visible_polyline(&collection, "test");
    let width = TimeIntervalProperty::new()
        .with_interval(TimeInterval::new(start, start.add_seconds(10.0)), 4.0_f32);
    object.write().unwrap().polyline.as_mut().unwrap().width = Some(Arc::new(width));

    visualizer.update(start).unwrap();
    assert_relative_eq!(primitive_at(&scene, 0).width(), 4.0);

    visualizer.update(start.add_seconds(60.0)).unwrap();
    assert_relative_eq!(primitive_at(&scene, 0).width(), 4.0);
}

#[test]
fn test_config_defaults_apply_to_new_primitives() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let config = VisualizerConfig {
        defaults: PolylineDefaults {
            color: Color::new(1.0, 0.0, 0.0, 1.0),
            width: 3.0,
            outline_color: Color::BLACK,
            outline_width: 1.5,
        },
        ..VisualizerConfig::default()
    };
    let mut visualizer = Visualizer::with_config(scene.clone(), collection.clone(), config).unwrap();

    add_visible_polyline(&collection, "test");
    visualizer.update(JulianDate::j2000()).unwrap();

    let primitive = primitive_at(&scene, 0);
    assert_relative_eq!(primitive.color(), Color::new(1.0, 0.0, 0.0, 1.0));
    assert_relative_eq!(primitive.width(), 3.0);
    assert_relative_eq!(primitive.outline_color(), Color::BLACK);
    assert_relative_eq!(primitive.outline_width(), 1.5);
}

#[test]
fn test_destroy_releases_primitives_and_unsubscribes() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    add_visible_polyline(&collection, "a");
    add_visible_polyline(&collection, "b");
    visualizer.update(JulianDate::j2000()).unwrap();
    assert_eq!(primitive_len(&scene), 2);

    visualizer.destroy().unwrap();

    assert_eq!(primitive_len(&scene), 0);
    assert_eq!(collection.listener_count(), 0);
    assert!(visualizer.dynamic_object_collection().is_none());
}

#[test]
fn test_drop_releases_primitives() {
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    {
        let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();
        add_visible_polyline(&collection, "test");
        visualizer.update(JulianDate::j2000()).unwrap();
        assert_eq!(primitive_len(&scene), 1);
    }
    assert_eq!(primitive_len(&scene), 0);
    assert_eq!(collection.listener_count(), 0);
}

#[test]
fn test_visualizers_share_registry_independently() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let first = DynamicObjectCollection::new();
    let second = DynamicObjectCollection::new();
    add_visible_polyline(&first, "a");
    add_visible_polyline(&second, "b");

    let mut first_visualizer = Visualizer::new(scene.clone(), first.clone()).unwrap();
    let mut second_visualizer = Visualizer::new(scene.clone(), second).unwrap();
    first_visualizer.update(time).unwrap();
    second_visualizer.update(time).unwrap();
    assert_eq!(primitive_len(&scene), 2);

    first.clear();
    assert_eq!(primitive_len(&scene), 1);
    assert_eq!(primitive_at(&scene, 0).owner(), Some(&EntityId::from("b")));

    second_visualizer.destroy().unwrap();
    assert_eq!(primitive_len(&scene), 0);
}

#[test]
fn test_primitive_removed_externally_is_recreated() {
    let time = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    let mut visualizer = Visualizer::new(scene.clone(), collection.clone()).unwrap();

    add_visible_polyline(&collection, "test");
    visualizer.update(time).unwrap();
    let handle = visualizer.primitive_for(&EntityId::from("test")).unwrap();
    scene.lock().unwrap().remove(handle);

    // First update notices the stale handle, the next one recreates
    visualizer.update(time).unwrap();
    visualizer.update(time).unwrap();

    assert_eq!(primitive_len(&scene), 1);
    assert_ne!(visualizer.primitive_for(&EntityId::from("test")), Some(handle));
}
