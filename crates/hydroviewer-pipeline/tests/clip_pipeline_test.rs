//! End-to-end tests of boundary normalization, region resolution, and
//! clipping against a fixture geometry store.

mod common;

use common::{planar_boundary, Fixture};
use hydroviewer_core::error::HydroviewerError;
use hydroviewer_core::models::{ClipTarget, Crs, ProjectDir, RegionName, COMID_FIELD};
use hydroviewer_pipeline::{BoundaryNormalizer, ClipPipeline};
use hydroviewer_store::shapefile_io::Layer;
use hydroviewer_store::GeometryStore;
use std::collections::BTreeSet;
use std::fs;

fn selected_ids(project: &ProjectDir, target: ClipTarget) -> BTreeSet<i64> {
    Layer::read(&project.selection_shp(target), &Crs::web_mercator())
        .unwrap()
        .features
        .iter()
        .filter_map(|f| f.id(COMID_FIELD))
        .collect()
}

/// Region `alpha` spans [0, 50 km]², with three rivers:
/// 1 inside the project, 2 outside, 3 crossing the edge with its middle
/// vertex inside
fn alpha_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.add_region("alpha", 0.0, 50_000.0);
    fixture.add_drainagelines(
        "alpha",
        COMID_FIELD,
        &[
            (1, vec![(1_000.0, 1_000.0), (2_000.0, 2_000.0), (3_000.0, 3_000.0)]),
            (2, vec![(20_000.0, 20_000.0), (21_000.0, 21_000.0), (22_000.0, 22_000.0)]),
            (3, vec![(5_000.0, 5_000.0), (9_000.0, 9_000.0), (15_000.0, 15_000.0)]),
        ],
    );
    fixture.add_catchments("alpha", &[1, 2, 3, 99]);
    fixture
}

#[test]
fn test_boundary_to_selections() {
    let fixture = alpha_fixture();
    let project = fixture.project("Small Basin");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(0.0, 10_000.0))
        .unwrap();

    let pipeline = ClipPipeline::new(&fixture.ctx);
    let report = pipeline.run(&project, None).unwrap();

    assert_eq!(report.region, RegionName::new("alpha-boundary"));
    assert_eq!(report.drainageline.total, 3);
    assert_eq!(report.drainageline.selected, 2);
    assert_eq!(report.catchment.selected, 2);

    let lines = selected_ids(&project, ClipTarget::Drainageline);
    let catchments = selected_ids(&project, ClipTarget::Catchment);
    assert_eq!(lines, BTreeSet::from([1, 3]));
    assert_eq!(catchments, lines);

    // Attributes survive the subset
    let layer = Layer::read(&project.selection_shp(ClipTarget::Drainageline), &Crs::web_mercator())
        .unwrap();
    assert!(layer.has_field("name"));
    assert!(project.selection_shp(ClipTarget::Drainageline).with_extension("prj").exists());

    let state = fixture.projects().state(&project).unwrap();
    assert!(state.boundaries && state.projected_boundary && state.shapefiles);
}

#[test]
fn test_reclip_replaces_previous_selection() {
    let fixture = alpha_fixture();
    let project = fixture.project("moving");
    let normalizer = BoundaryNormalizer::from_context(&fixture.ctx);
    let pipeline = ClipPipeline::new(&fixture.ctx);

    normalizer.from_geojson(&project, &planar_boundary(0.0, 10_000.0)).unwrap();
    pipeline.run(&project, None).unwrap();

    fs::write(project.selection_dir(ClipTarget::Drainageline).join("stray.txt"), b"x").unwrap();

    normalizer.from_geojson(&project, &planar_boundary(19_000.0, 23_000.0)).unwrap();
    pipeline.run(&project, None).unwrap();

    assert_eq!(selected_ids(&project, ClipTarget::Drainageline), BTreeSet::from([2]));
    assert_eq!(selected_ids(&project, ClipTarget::Catchment), BTreeSet::from([2]));
    assert!(!project.selection_dir(ClipTarget::Drainageline).join("stray.txt").exists());
}

#[test]
fn test_no_region_found() {
    let fixture = alpha_fixture();
    let project = fixture.project("far_away");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(900_000.0, 910_000.0))
        .unwrap();

    let err = ClipPipeline::new(&fixture.ctx).resolve(&project).unwrap_err();
    assert!(matches!(err, HydroviewerError::NoRegionFound));
}

#[test]
fn test_spanning_boundary_resolves_to_first_listed_region() {
    let fixture = Fixture::new();
    fixture.add_region("east", 40_000.0, 90_000.0);
    fixture.add_region("west", 0.0, 50_000.0);

    let project = fixture.project("border");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(45_000.0, 48_000.0))
        .unwrap();

    let listed = GeometryStore::new(&fixture.ctx.shapefile_dir).regions().unwrap();
    let pipeline = ClipPipeline::new(&fixture.ctx);
    let resolved = pipeline.resolve(&project).unwrap();
    assert_eq!(resolved, listed[0]);

    // Same inputs, same answer
    assert_eq!(pipeline.resolve(&project).unwrap(), resolved);
}

#[test]
fn test_boundary_inside_one_region_resolves_to_it_in_any_order() {
    let west = ("west", 0.0, 50_000.0);
    let east = ("east", 100_000.0, 150_000.0);
    for order in [[west, east], [east, west]] {
        let fixture = Fixture::new();
        for (region, min, max) in order {
            fixture.add_region(region, min, max);
        }

        let project = fixture.project("eastern");
        BoundaryNormalizer::from_context(&fixture.ctx)
            .from_geojson(&project, &planar_boundary(110_000.0, 120_000.0))
            .unwrap();

        let listed = GeometryStore::new(&fixture.ctx.shapefile_dir).regions().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(
            ClipPipeline::new(&fixture.ctx).resolve(&project).unwrap(),
            RegionName::new("east-boundary"),
            "listed as {listed:?}"
        );
    }
}

#[test]
fn test_catchment_clip_checks_network_before_resolving() {
    let fixture = alpha_fixture();
    let project = fixture.project("unresolvable");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(900_000.0, 910_000.0))
        .unwrap();

    let pipeline = ClipPipeline::new(&fixture.ctx);
    let err = pipeline.clip(&project, None, ClipTarget::Catchment).unwrap_err();
    assert!(matches!(err, HydroviewerError::PrerequisiteMissing { .. }));

    // The drainage lines themselves still fail on the region
    let err = pipeline.clip(&project, None, ClipTarget::Drainageline).unwrap_err();
    assert!(matches!(err, HydroviewerError::NoRegionFound));
}

#[test]
fn test_catchments_require_network_selection() {
    let fixture = alpha_fixture();
    let project = fixture.project("out_of_order");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(0.0, 10_000.0))
        .unwrap();

    let err = ClipPipeline::new(&fixture.ctx)
        .clip(&project, Some(RegionName::new("alpha-boundary")), ClipTarget::Catchment)
        .unwrap_err();
    assert!(matches!(err, HydroviewerError::PrerequisiteMissing { .. }));
    assert!(!project.selection_dir(ClipTarget::Catchment).exists());
}

#[test]
fn test_missing_identifier_field_is_invalid_dataset() {
    let fixture = Fixture::new();
    fixture.add_region("beta", 0.0, 50_000.0);
    fixture.add_drainagelines(
        "beta",
        "HYDROID",
        &[(1, vec![(1_000.0, 1_000.0), (2_000.0, 2_000.0), (3_000.0, 3_000.0)])],
    );

    let project = fixture.project("no_comid");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(0.0, 10_000.0))
        .unwrap();

    let err = ClipPipeline::new(&fixture.ctx)
        .clip(&project, None, ClipTarget::Drainageline)
        .unwrap_err();
    assert!(matches!(err, HydroviewerError::InvalidDataset { .. }));
}

#[test]
fn test_missing_region_dataset() {
    let fixture = Fixture::new();
    fixture.add_region("gamma", 0.0, 50_000.0);

    let project = fixture.project("partial_store");
    BoundaryNormalizer::from_context(&fixture.ctx)
        .from_geojson(&project, &planar_boundary(0.0, 10_000.0))
        .unwrap();

    let err = ClipPipeline::new(&fixture.ctx)
        .clip(&project, None, ClipTarget::Drainageline)
        .unwrap_err();
    match err {
        HydroviewerError::RegionNotFound { name, .. } => assert_eq!(name, "gamma-drainageline"),
        other => panic!("unexpected error: {other:?}"),
    }
}
