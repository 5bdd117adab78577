use storage::repository::{PreferenceRepository, Storage};

use crate::tours::DASHBOARD_TOUR_KEY;

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_tour_targets() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    for id in ["kpi-revenue", "campaign-list", "retention-panel"] {
        let attr = format!(r#"id="{id}""#);
        assert!(html.contains(&attr), "missing {attr} in {html}");
    }
    assert!(html.contains("€48,250"), "missing revenue in {html}");
    assert!(html.contains("Spring challenge"), "missing campaign in {html}");
    assert!(!html.contains("tour-layer"), "overlay drawn before measuring in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_does_not_mark_tour_seen_on_render() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let flag = harness
        .storage
        .preferences
        .get_preference(DASHBOARD_TOUR_KEY)
        .await
        .unwrap();
    assert_eq!(flag, None);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_restores_collapsed_retention_panel() {
    let storage = Storage::in_memory();
    storage
        .preferences
        .set_preference("panel_state_dashboard_retention", "true")
        .await
        .unwrap();
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("panel--collapsed"), "panel not collapsed in {html}");
    assert!(html.contains(">Show<"), "missing show toggle in {html}");
    assert!(!html.contains("Laura Gómez"), "collapsed panel lists members in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_restores_expanded_rows() {
    let storage = Storage::in_memory();
    storage
        .preferences
        .set_preference("panel_state_dashboard_retention_expanded", r#"["member-104"]"#)
        .await
        .unwrap();
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Offer a free session"), "expanded row missing detail in {html}");
    assert!(
        !html.contains("Send the new evening class schedule"),
        "collapsed row shows detail in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_ignores_corrupt_panel_state() {
    let storage = Storage::in_memory();
    storage
        .preferences
        .set_preference("panel_state_dashboard_retention", "{oops")
        .await
        .unwrap();
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Laura Gómez"), "panel should default to expanded in {html}");
    assert!(html.contains(">Hide<"), "missing hide toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_offers_replay_and_layout_reset() {
    let mut harness = setup_view_harness(ViewKind::Settings);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Replay dashboard tour"), "missing replay button in {html}");
    assert!(html.contains("Reset dashboard layout"), "missing reset button in {html}");
    assert!(!html.contains("settings-status"), "unexpected status in {html}");
}
