use std::path::{Path, PathBuf};

use pdataviewer_chord::config::{Config, LayoutConfig};
use pdataviewer_chord::layout::compute_chord_layout;
use pdataviewer_chord::render::render_svg;
use pdataviewer_chord::source::{load_chord_data, load_cohort_metadata};
use pdataviewer_chord::stage::DrawOutcome;
use pdataviewer_chord::theme::Theme;
use pdataviewer_chord::{ChordData, ChordDiagramService, ColorScale, RenderQueue, Stage, chunk_data};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn assert_valid_svg(svg: &str, label: &str) {
    assert!(svg.starts_with("<svg"), "{label}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{label}: missing </svg tag");
}

fn node_names(chunk: &ChordData) -> Vec<String> {
    chunk.nodes.iter().map(|node| node.key()).collect()
}

#[test]
fn mappings_fixture_packs_whole_components() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let chunks = chunk_data(&data, 4);
    assert_eq!(chunks.len(), 3);
    assert_eq!(
        node_names(&chunks[0]),
        vec!["age|PPMI", "age|BIOFIND", "age|LuxPARK"]
    );
    assert_eq!(chunks[1].nodes.len(), 4);
    assert_eq!(chunks[1].links.len(), 2);
    assert_eq!(
        node_names(&chunks[2]),
        vec!["moca_total|BIOFIND", "moca|PPMI", "education_years|LuxPARK"]
    );

    // the dangling diagnosis link never lands in a chunk
    let total_links: usize = chunks.iter().map(|chunk| chunk.links.len()).sum();
    assert_eq!(total_links, 4);
}

#[test]
fn default_chunk_size_keeps_small_documents_together() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let mut service = ChordDiagramService::default();
    let chunks = service.chunk_data(&data, service.default_chunk_size());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].nodes.len(), data.nodes.len());
}

#[test]
fn ambiguous_names_form_one_component() {
    let data = load_chord_data(Some(&fixture("ambiguous.json"))).expect("fixture load failed");
    let chunks = chunk_data(&data, 1);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].nodes.len(), 2);
    assert_eq!(chunks[0].links.len(), 1);
}

#[test]
fn render_every_chunk_with_cohort_colors() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let metadata = load_cohort_metadata(&fixture("cohorts.json")).expect("metadata load failed");
    let colors = ColorScale::from_metadata(&metadata);
    let theme = Theme::dashboard();
    let config = LayoutConfig::default();

    for (idx, chunk) in chunk_data(&data, 4).iter().enumerate() {
        let layout = compute_chord_layout(chunk, &colors, &theme, &config);
        let svg = render_svg(&layout, &theme);
        assert_valid_svg(&svg, &format!("chunk {idx}"));
        assert_eq!(svg.matches("class=\"node-label\"").count(), chunk.nodes.len());
    }

    let first = compute_chord_layout(&chunk_data(&data, 4)[0], &colors, &theme, &config);
    let svg = render_svg(&first, &theme);
    assert!(svg.contains("#1f77b4"));
    assert!(svg.contains("#ff7f0e"));
    // LuxPARK carries no colour in the metadata
    assert!(svg.contains(&theme.fallback_group_color));
    assert!(svg.contains("startOffset=\"25%\""));
    assert_eq!(svg.matches("class=\"ribbon\"").count(), 3);
}

#[test]
fn long_variable_names_shrink_their_labels() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let chunks = chunk_data(&data, 4);
    let layout = compute_chord_layout(
        &chunks[1],
        &ColorScale::default(),
        &Theme::dashboard(),
        &LayoutConfig::default(),
    );
    let long = layout
        .nodes
        .iter()
        .find(|node| node.name == "mds_updrs_part_iii_summary_score")
        .expect("long label present");
    assert_eq!(long.label.font_size, 13.0);
    let short = layout.nodes.iter().find(|node| node.name == "sex").expect("short label present");
    assert_eq!(short.label.font_size, 15.0);
}

#[test]
fn dashboard_flow_draws_batches_and_guards_teardown() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let service = {
        let mut service = ChordDiagramService::new(&Config::default());
        service.chunk_data(&data, 4);
        service
    };
    let chunks = service.data_chunks().to_vec();
    let colors = ColorScale::category10().with_groups_of(&data);

    let mut stage = Stage::with_mounts(service.mount_hook(), chunks.len());
    let mut queue = RenderQueue::new();
    service.schedule_chord_diagrams(&chunks, &stage, &mut queue);
    let reports = service.run_scheduled(&mut queue, &mut stage, &colors);
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| matches!(r.result, Ok(DrawOutcome::Drawn))));
    for mount in stage.mounts() {
        let svg = mount.scene().expect("mount drawn").to_svg();
        assert_valid_svg(&svg, &mount.hook);
    }

    // navigating away before the deferred draws run
    service.schedule_chord_diagrams(&chunks, &stage, &mut queue);
    stage.teardown();
    let reports = service.run_scheduled(&mut queue, &mut stage, &colors);
    assert!(reports.iter().all(|r| matches!(r.result, Ok(DrawOutcome::Skipped))));
}

#[test]
fn hover_state_survives_on_the_mount() {
    let data = load_chord_data(Some(&fixture("mappings.json"))).expect("fixture load failed");
    let mut service = ChordDiagramService::default();
    let chunks = service.chunk_data(&data, 4);
    let mut stage = Stage::with_mounts(service.mount_hook(), 1);
    service
        .create_chord_diagrams(&chunks, 0, &mut stage, &ColorScale::default())
        .expect("draw failed");

    let theme = service.theme().clone();
    let scene = stage
        .resolve_mut(service.mount_hook(), 0)
        .and_then(|mount| mount.scene_mut())
        .expect("scene retained");
    let resting = scene.to_svg();
    scene.mouse_over(0);
    let hovered = scene.to_svg();
    assert_ne!(resting, hovered);
    assert!(hovered.contains(&format!("fill-opacity=\"{}\"", theme.ribbon_highlight_opacity)));
    scene.mouse_out();
    assert_eq!(scene.to_svg(), resting);
}
