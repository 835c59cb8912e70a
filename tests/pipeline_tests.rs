mod support;

use wall_detector::{
    DetectorConfig, Liveness, NodeId, detect,
    errors::PipelineError,
    scene::{SceneHost, memory::MemoryScene},
};

use crate::support::{aabb, approx_eq, plate_buffer, single_wall_model};

#[tokio::test]
async fn wall_is_split_by_two_stacked_slabs() {
    let (scene, wall) = single_wall_model();
    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");

    assert_eq!(results.len(), 2);
    // topmost floor first, named after the floor below the slab
    assert_eq!(results[0].name, "Level 1");
    assert_eq!(results[1].name, "Level 0");
    assert_eq!(results[0].slab_index, 1);
    assert_ne!(results[0].color, results[1].color);

    let mut total = 0.0;
    for result in &results {
        assert!(!result.active);
        assert_eq!(result.segments.len(), 1);
        let segment = &result.segments[0];
        assert_eq!(segment.wall, wall);
        assert_eq!(segment.mesh.metadata, Some(wall));
        assert!(approx_eq(segment.volume(), 1.5, 1e-6), "{}", segment.volume());

        let bb = segment.mesh.polygons.iter().fold(
            (f64::MAX, f64::MIN),
            |(lo, hi), p| {
                let b = p.bounding_box();
                (lo.min(b.mins.z), hi.max(b.maxs.z))
            },
        );
        assert!(approx_eq(bb.1 - bb.0, 1.5, 1e-6));
        total += segment.volume();
    }
    assert!(approx_eq(total, 3.0, 1e-6));
}

#[tokio::test]
async fn every_segment_polygon_is_tagged() {
    let (scene, wall) = single_wall_model();
    let floors = scene.leaf_ids(scene.child_ids(MemoryScene::ROOT).await[0]).await;
    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    for result in &results {
        for poly in result.segments.iter().flat_map(|s| &s.mesh.polygons) {
            let tag = poly.metadata.expect("tag");
            assert!(tag == wall || floors.contains(&tag), "unexpected tag {tag:?}");
        }
    }
}

#[tokio::test]
async fn missing_groups_yield_no_results() {
    let mut scene = MemoryScene::new();
    let walls = scene.add_node(MemoryScene::ROOT, "Walls");
    scene
        .add_box(walls, "Wall", &aabb([0.0, 0.0, 0.0], [1.0, 1.0, 3.0]))
        .expect("wall");
    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    assert!(results.is_empty());

    // floors without walls: one result per slab, nothing to show
    let mut scene = MemoryScene::new();
    let floors = scene.add_node(MemoryScene::ROOT, "Floors");
    for z in [0.0, 3.0] {
        let floor = scene.add_node(floors, format!("F{z}"));
        scene.add_fragment(floor, plate_buffer(z, [0.0, 0.0], [5.0, 5.0]));
    }
    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    assert_eq!(results.len(), 1);
    assert!(results[0].segments.is_empty());
}

#[tokio::test]
async fn group_names_match_exactly() {
    let (scene, _) = single_wall_model();
    let config = DetectorConfig {
        floor_group: "floors".to_string(),
        ..DetectorConfig::default()
    };
    let results = detect(&scene, &config, &Liveness::new()).await.expect("detect");
    assert!(results.is_empty());
}

#[tokio::test]
async fn custom_group_names() {
    let mut scene = MemoryScene::new();
    let floors = scene.add_node(MemoryScene::ROOT, "Storeys");
    for (name, z) in [("A", 0.0), ("B", 2.0)] {
        let floor = scene.add_node(floors, name);
        scene.add_fragment(floor, plate_buffer(z, [-1.0, -1.0], [3.0, 3.0]));
    }
    let walls = scene.add_node(MemoryScene::ROOT, "Facade");
    scene
        .add_box(walls, "W", &aabb([0.0, 0.0, 0.0], [2.0, 0.5, 2.0]))
        .expect("wall");

    let config = DetectorConfig {
        floor_group: "Storeys".to_string(),
        wall_group: "Facade".to_string(),
        ..DetectorConfig::default()
    };
    let results = detect(&scene, &config, &Liveness::new()).await.expect("detect");
    assert_eq!(results.len(), 1);
    assert!(approx_eq(results[0].segments[0].volume(), 2.0, 1e-6));
}

#[tokio::test]
async fn broken_fragments_and_walls_are_skipped() {
    let (mut scene, wall) = single_wall_model();
    // the good wall gets an extra fragment that never loads
    scene.add_unloaded_fragment(wall);

    let walls = scene.child_ids(MemoryScene::ROOT).await[1];
    let ghost = scene.add_node(walls, "Ghost wall");
    scene.add_unloaded_fragment(ghost);

    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    assert_eq!(results.len(), 2);
    for result in &results {
        // the ghost contributes no segment
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].wall, wall);
        assert!(approx_eq(result.segments[0].volume(), 1.5, 1e-6));
    }
}

#[tokio::test]
async fn wall_missing_a_slab_gets_an_empty_segment() {
    let (mut scene, _) = single_wall_model();
    let walls = scene.child_ids(MemoryScene::ROOT).await[1];
    let low = scene
        .add_box(walls, "Parapet", &aabb([1.5, 0.0, 0.0], [1.8, 1.0, 1.0]))
        .expect("wall");

    let results = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    let top = &results[0];
    let parapet = top
        .segments
        .iter()
        .find(|s| s.wall == low)
        .expect("one segment per wall");
    assert!(parapet.is_empty());

    let bottom = &results[1];
    let parapet = bottom.segments.iter().find(|s| s.wall == low).expect("segment");
    assert!(approx_eq(parapet.volume(), 0.3, 1e-6));
}

#[tokio::test]
async fn cancelled_before_commit() {
    let (scene, _) = single_wall_model();
    let liveness = Liveness::new();
    liveness.cancel();
    let result = detect(&scene, &DetectorConfig::default(), &liveness).await;
    assert!(matches!(result, Err(PipelineError::Cancelled { completed: 0, .. })));
}

#[tokio::test]
async fn ids_are_stable_across_runs() {
    let (scene, _) = single_wall_model();
    let a = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    let b = detect(&scene, &DetectorConfig::default(), &Liveness::new())
        .await
        .expect("detect");
    let floors = |r: &[wall_detector::FloorResult]| r.iter().map(|f| f.floor).collect::<Vec<NodeId>>();
    assert_eq!(floors(&a), floors(&b));
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.segments[0].mesh.polygons, y.segments[0].mesh.polygons);
    }
}
