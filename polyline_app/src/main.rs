//! Polyline demo application
//!
//! Drives a polyline visualizer over a small synthetic scene for a fixed
//! number of frames, exercising creation, in-place updates, hiding, removal
//! and a full clear. Stands in for a renderer by consuming the dirty set of
//! every primitive each frame.
//!
//! Usage: `polyline_demo [config.toml|config.ron]`

use dynamic_scene::foundation::logging;
use dynamic_scene::prelude::*;
use std::sync::Arc;

// Configuration constants
const TRACK_COUNT: usize = 8;
const FRAME_COUNT: u64 = 240;
const FRAME_STEP_SECONDS: f64 = 1.0 / 60.0;
const SAMPLE_SPACING_SECONDS: f64 = 1.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading visualizer config from {}", path);
            VisualizerConfig::load_from_file(&path)?
        }
        None => VisualizerConfig::default(),
    };
    log::info!("Removal policy: {:?}", config.removal_policy);

    let start = JulianDate::j2000();
    let scene = PrimitiveCollection::shared();
    let collection = DynamicObjectCollection::new();
    for index in 0..TRACK_COUNT {
        spawn_track(&collection, index, start);
    }

    let mut visualizer = DynamicPolylineVisualizer::with_config(scene.clone(), collection.clone(), config)?;
    let mut clock = FrameClock::new(start, FRAME_STEP_SECONDS);

    while clock.frame_count() < FRAME_COUNT {
        let time = clock.tick();
        let frame = clock.frame_count();

        if frame == FRAME_COUNT / 2 {
            let id = track_id(0);
            collection.remove_object(&id);
            log::info!("Frame {}: removed {}", frame, id);
        }
        if frame == FRAME_COUNT * 3 / 4 {
            collection.clear();
            log::info!("Frame {}: cleared collection", frame);
        }

        visualizer.update(time)?;

        let (visible, uploaded) = consume_frame(&scene);
        if frame % 60 == 0 {
            log::info!(
                "Frame {}: {} primitives, {} visible, {} uploaded, {} tracked",
                frame,
                scene.lock().map(|s| s.len()).unwrap_or_default(),
                visible,
                uploaded,
                visualizer.tracked_len()
            );
        }
    }

    visualizer.destroy()?;
    log::info!("Done after {} frames", clock.frame_count());
    Ok(())
}

fn track_id(index: usize) -> EntityId {
    EntityId::new(format!("track-{index}"))
}

/// Add a track whose positions drift over time and that blinks off every
/// few seconds for the odd-numbered tracks.
#[allow(clippy::cast_precision_loss)]
fn spawn_track(collection: &DynamicObjectCollection, index: usize, start: JulianDate) {
    let offset = index as f64 * 10.0;
    let mut positions = SampledPositions::new();
    for step in 0..=8 {
        let t = f64::from(step) * SAMPLE_SPACING_SECONDS;
        positions.add_sample(
            start.add_seconds(t),
            vec![
                Cartesian3::new(offset, 0.0, t),
                Cartesian3::new(offset, 100.0, t * 2.0),
                Cartesian3::new(offset + 50.0, 100.0, t * 3.0),
            ],
        );
    }

    let show: Arc<dyn Property<bool>> = if index % 2 == 1 {
        Arc::new(
            TimeIntervalProperty::new()
                .with_interval(TimeInterval::new(start, start.add_seconds(1.5)), true)
                .with_interval(TimeInterval::new(start.add_seconds(1.5), start.add_seconds(2.0)), false)
                .with_interval(TimeInterval::new(start.add_seconds(2.0), start.add_seconds(8.0)), true),
        )
    } else {
        Arc::new(ConstantProperty::new(true))
    };

    let hue = index as f32 / TRACK_COUNT as f32;
    let object = collection.get_or_create_object(track_id(index));
    let mut object = object.write().unwrap_or_else(std::sync::PoisonError::into_inner);
    object.vertex_positions = Some(Arc::new(positions));
    object.polyline = Some(DynamicPolyline {
        show: Some(show),
        color: Some(Arc::new(ConstantProperty::new(Color::new(hue, 1.0 - hue, 0.5, 1.0)))),
        width: Some(Arc::new(ConstantProperty::new(2.0_f32))),
        outline_color: Some(Arc::new(ConstantProperty::new(Color::BLACK))),
        outline_width: Some(Arc::new(ConstantProperty::new(1.0_f32))),
    });
}

/// Play the renderer's part: count visible primitives and take their dirty sets
fn consume_frame(scene: &SharedRegistry<PrimitiveCollection>) -> (usize, usize) {
    let Ok(mut scene) = scene.lock() else {
        return (0, 0);
    };
    let mut visible = 0;
    let mut uploaded = 0;
    for index in 0..scene.len() {
        let Some(handle) = scene.get(index) else {
            continue;
        };
        if let Some(polyline) = scene.polyline_mut(handle) {
            if polyline.show() {
                visible += 1;
            }
            if !polyline.take_dirty().is_empty() {
                uploaded += 1;
            }
        }
    }
    (visible, uploaded)
}
