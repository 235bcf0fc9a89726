//! End-to-end scenarios for the heat map pipeline.

use std::sync::{Arc, Mutex};

use heatmap_raster::{
    AccumulationBuffer, Brightness, GradientTable, HeatMap, HeatMapConfig, HeatMapError,
    HeatMapRenderer, OpacityProfile, Rgba8, Stamp, StampCache,
};

fn scattered_points() -> Vec<(f64, f64)> {
    (0..25)
        .map(|i| {
            let t = i as f64;
            (20.0 + (t * 37.0) % 160.0, 15.0 + (t * 53.0) % 70.0)
        })
        .collect()
}

fn tracked_map(width: u32, height: u32) -> HeatMap {
    HeatMap::new(
        HeatMapConfig::new(width, height)
            .with_event_radius(9.0)
            .with_opacity_distribution(OpacityProfile::CUSTOM),
    )
    .unwrap()
}

#[test]
fn test_single_event_center_and_rim() {
    let gradient = GradientTable::BLACK_WHITE;
    let mut map = HeatMap::new(
        HeatMapConfig::new(10, 10)
            .with_color_mapping(gradient.clone())
            .with_fade_colors(true)
            .with_event_radius(5.0)
            .with_opacity_distribution(OpacityProfile::LINEAR),
    )
    .unwrap();
    map.add_event(5.0, 5.0).unwrap();

    let expected = Rgba8::from_rgba(&gradient.color_at(OpacityProfile::LINEAR.opacity_at(0.0)));
    let center = map.image().pixel(5, 5);
    for (got, want) in [
        (center.r, expected.r),
        (center.g, expected.g),
        (center.b, expected.b),
    ] {
        assert!((got as i32 - want as i32).abs() <= 1, "got {} want {}", got, want);
    }
    assert!((center.a as f64 / 255.0 - 0.90).abs() < 0.01, "alpha {}", center.a);

    for y in 0..10u32 {
        for x in 0..10u32 {
            let dx = x as f64 - 5.0;
            let dy = y as f64 - 5.0;
            if (dx * dx + dy * dy).sqrt() >= 5.0 {
                assert_eq!(map.image().pixel(x, y), Rgba8::new(0, 0, 0, 0), "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn test_render_twice_is_byte_identical() {
    let mut map = tracked_map(200, 100);
    map.add_events(scattered_points()).unwrap();
    let renderer = HeatMapRenderer::new(Brightness::Fast, Default::default());
    let a = renderer
        .render(map.buffer(), &GradientTable::INFRARED_2, true)
        .unwrap();
    let b = renderer
        .render(map.buffer(), &GradientTable::INFRARED_2, true)
        .unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_stamp_determinism_across_caches() {
    for profile in OpacityProfile::PRESETS {
        for radius in [1.0, 2.5, 7.0, 15.5] {
            let a = StampCache::new().get(radius, profile).unwrap();
            let b = StampCache::new().get(radius, profile).unwrap();
            assert_eq!(*a, *b);
        }
    }
}

#[test]
fn test_reprofile_round_trip() {
    let mut once = tracked_map(200, 100);
    once.add_events(scattered_points()).unwrap();
    once.reprofile_all(&OpacityProfile::LINEAR).unwrap();

    let mut thrice = tracked_map(200, 100);
    thrice.add_events(scattered_points()).unwrap();
    thrice.reprofile_all(&OpacityProfile::LINEAR).unwrap();
    thrice.reprofile_all(&OpacityProfile::EXPONENTIAL).unwrap();
    assert_ne!(thrice.buffer(), once.buffer());
    thrice.reprofile_all(&OpacityProfile::LINEAR).unwrap();

    assert_eq!(thrice.buffer(), once.buffer());
    assert_eq!(thrice.image(), once.image());
}

#[test]
fn test_reprofile_matches_fresh_painting() {
    let mut reprofiled = tracked_map(120, 80);
    reprofiled.add_event_with(30.0, 30.0, 12.0, &OpacityProfile::CUSTOM).unwrap();
    reprofiled.add_event_with(50.0, 40.0, 6.0, &OpacityProfile::EXPONENTIAL).unwrap();
    reprofiled.reprofile_all(&OpacityProfile::TAN_HYP).unwrap();

    let mut fresh = tracked_map(120, 80);
    fresh.add_event_with(30.0, 30.0, 12.0, &OpacityProfile::TAN_HYP).unwrap();
    fresh.add_event_with(50.0, 40.0, 6.0, &OpacityProfile::TAN_HYP).unwrap();

    assert_eq!(reprofiled.buffer(), fresh.buffer());
    assert_eq!(reprofiled.opacity_distribution(), &OpacityProfile::TAN_HYP);
}

#[test]
fn test_clear_renders_background_regardless_of_event_count() {
    for n in [0usize, 1, 25] {
        let mut map = tracked_map(200, 100);
        map.add_events(scattered_points().into_iter().take(n)).unwrap();
        map.clear_heat_map();
        assert!(map.events().is_empty());
        assert!(map.buffer().is_blank());
        let background = Rgba8::new(0, 255, 0, 0);
        assert!(map.image().is_filled_with(background), "n={}", n);
    }
}

#[test]
fn test_resize_discards_density() {
    let mut map = tracked_map(400, 400);
    map.add_events([(100.0, 100.0), (200.0, 200.0), (300.0, 350.0)])
        .unwrap();
    assert!(!map.buffer().is_blank());

    map.set_size(800, 400).unwrap();
    assert_eq!((map.width(), map.height()), (800, 400));
    assert!(map.buffer().is_blank());
    assert!(map.events().is_empty());
    assert_eq!(map.image().pixel(100, 100).a, 0);
    assert_eq!(map.image().pixel(200, 200).a, 0);

    // Reprofiling afterwards cannot bring the old events back.
    map.reprofile_all(&OpacityProfile::LINEAR).unwrap();
    assert!(map.buffer().is_blank());
}

#[test]
fn test_event_at_origin_is_clipped_but_visible() {
    let mut map = HeatMap::new(HeatMapConfig::new(50, 50).with_event_radius(10.0)).unwrap();
    map.add_event(0.0, 0.0).unwrap();
    assert!(map.image().pixel(0, 0).a > 0);
    assert!(map.image().pixel(5, 0).a > 0);
    assert_eq!(map.image().pixel(30, 30).a, 0);
}

#[test]
fn test_far_outside_events_are_harmless() {
    let mut map = tracked_map(50, 50);
    map.add_events([(-1e9, 25.0), (25.0, 1e12), (f64::MAX, f64::MIN)])
        .unwrap();
    assert!(map.buffer().is_blank());
    assert_eq!(map.events().len(), 3);
}

#[test]
fn test_non_finite_events_leave_no_trace() {
    let mut map = HeatMap::new(
        HeatMapConfig::new(50, 50)
            .with_event_radius(10.0)
            .with_opacity_distribution(OpacityProfile::LINEAR),
    )
    .unwrap();
    let blank = map.image().clone();
    map.add_event(f64::NAN, f64::NAN).unwrap();
    map.add_events([(f64::INFINITY, f64::NEG_INFINITY), (f64::NAN, 25.0)])
        .unwrap();
    assert!(map.buffer().is_blank());
    assert_eq!(map.buffer().pixel(10, 10).a, 0.0);
    assert!(map.events().is_empty());
    assert_eq!(map.image(), &blank);
}

#[test]
fn test_weighted_stamps() {
    let mut map = tracked_map(60, 30);
    let light = Arc::new(Stamp::from_alpha(10, vec![0.2; 100]).unwrap());
    let heavy = Arc::new(Stamp::from_alpha(10, vec![0.8; 100]).unwrap());
    map.add_event_stamp(15.0, 15.0, light, 5.0, 5.0);
    map.add_event_stamp(45.0, 15.0, Arc::clone(&heavy), 5.0, 5.0);
    let light_alpha = map.buffer().pixel(15, 15).a;
    let heavy_alpha = map.buffer().pixel(45, 15).a;
    assert_eq!(light_alpha, 0.2);
    assert_eq!(heavy_alpha, 0.8);
    assert!(map.image().pixel(45, 15).a > map.image().pixel(15, 15).a);

    // Re-profiling repaints weighted events with their own stamps.
    map.add_event(30.0, 15.0).unwrap();
    map.reprofile_all(&OpacityProfile::EXPONENTIAL).unwrap();
    assert_eq!(map.buffer().pixel(15, 15).a, light_alpha);
    assert_eq!(map.buffer().pixel(45, 15).a, heavy_alpha);
    assert_eq!(map.events()[1].profile, OpacityProfile::CUSTOM);
    assert_eq!(map.events()[2].profile, OpacityProfile::EXPONENTIAL);
    assert!(Arc::ptr_eq(
        &map.events()[1].placement.as_ref().unwrap().stamp,
        &heavy
    ));
}

#[test]
fn test_failed_resize_keeps_previous_state() {
    let mut map = tracked_map(40, 40);
    map.add_events([(10.0, 10.0), (30.0, 25.0)]).unwrap();
    let image = map.image().clone();
    let events = map.events().to_vec();
    let err = map.set_size(i32::MAX, i32::MAX).unwrap_err();
    assert!(matches!(err, HeatMapError::Allocation { .. }));
    assert_eq!((map.width(), map.height()), (40, 40));
    assert_eq!(map.events(), events.as_slice());
    assert_eq!(map.image(), &image);
    // Still usable afterwards.
    map.add_event(20.0, 20.0).unwrap();
    assert_eq!(map.events().len(), 3);
}

#[test]
fn test_unallocatable_stamp_is_reported() {
    let mut map = tracked_map(40, 40);
    map.add_event(20.0, 20.0).unwrap();
    let image = map.image().clone();
    let err = map
        .add_event_with(10.0, 10.0, 1e12, &OpacityProfile::LINEAR)
        .unwrap_err();
    assert!(matches!(err, HeatMapError::Allocation { .. }));
    assert_eq!(map.events().len(), 1);
    assert_eq!(map.image(), &image);
}

#[test]
fn test_gradient_lookup_clamps_everywhere() {
    for table in GradientTable::PRESETS {
        assert_eq!(table.color_at(-5.0), table.color_at(0.0));
        assert_eq!(table.color_at(5.0), table.color_at(1.0));
        for stop in table.stops() {
            assert_eq!(table.color_at(stop.offset), stop.color);
        }
    }
}

#[test]
fn test_profiles_share_boundary_values() {
    for profile in OpacityProfile::PRESETS {
        assert_eq!(profile.opacity_at(0.0), 0.90);
        assert_eq!(profile.opacity_at(1.0), 0.0);
    }
}

#[test]
fn test_serialized_access_from_threads() {
    let map = Arc::new(Mutex::new(tracked_map(100, 100)));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let map = Arc::clone(&map);
            std::thread::spawn(move || {
                for j in 0..10 {
                    let mut guard = map.lock().unwrap();
                    guard.add_event(10.0 + i as f64 * 20.0, 10.0 + j as f64 * 8.0).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let map = map.lock().unwrap();
    assert_eq!(map.events().len(), 40);
    assert_eq!(map.stamp_cache().len(), 1);
}

#[test]
fn test_custom_gradient_is_accepted() {
    use heatmap_raster::{Rgba, Stop};

    let table = GradientTable::new(
        "teal",
        vec![
            Stop::new(0.0, Rgba::new_rgb(0.0, 0.2, 0.2)),
            Stop::new(1.0, Rgba::new_rgb(0.0, 1.0, 1.0)),
        ],
    )
    .unwrap();
    let mut map = tracked_map(40, 40);
    map.set_color_mapping(table.clone());
    map.add_event(20.0, 20.0).unwrap();
    assert_eq!(map.color_mapping().name(), "teal");
    assert_eq!(map.image().pixel(20, 20).r, 0);
    assert!(map.image().pixel(20, 20).g > 200);

    let blank = AccumulationBuffer::new(4, 4).unwrap();
    let img = HeatMapRenderer::<Brightness>::default()
        .render(&blank, &table, false)
        .unwrap();
    assert!(img.is_filled_with(Rgba8::new(0, 51, 51, 255)));
}
