use super::*;
use shared::protocol::PollResponse;

fn decode(body: &str) -> PollResult {
    serde_json::from_str::<PollResponse>(body)
        .expect("poll response")
        .into()
}

fn renderer() -> StatusRenderer<MemoryStatusView> {
    StatusRenderer::new(MemoryStatusView::default())
}

#[test]
fn renders_searching_status_with_one_match_row() {
    let mut renderer = renderer();

    renderer.render(&decode(
        r#"{"status":"searching","matches":[{"driver__user__username":"alice","status":"pending","distance_to_pickup_km":2.3,"eta_to_pickup_min":5}],"ride":null}"#,
    ));

    let view = renderer.view();
    assert_eq!(view.status_text, "searching");
    assert_eq!(
        view.match_rows,
        vec![MatchRow {
            driver_name: "alice".into(),
            status: "pending".into(),
            distance_km: "2.3".into(),
            eta_min: "5".into(),
        }]
    );
    assert!(view.assignment.is_none());
    let line = view.match_rows[0].to_string();
    for part in ["alice", "pending", "2.3", "5"] {
        assert!(line.contains(part), "{line} should contain {part}");
    }
}

#[test]
fn match_row_shows_decimals_as_sent() {
    let mut renderer = renderer();

    renderer.render(&decode(
        r#"{"status":"searching","matches":[{"driver__user__username":"erin","status":"pending","distance_to_pickup_km":"2.30","eta_to_pickup_min":"7.0"}]}"#,
    ));

    let row = &renderer.view().match_rows[0];
    assert_eq!(row.distance_km, "2.30");
    assert_eq!(row.eta_min, "7.0");
    assert_eq!(row.to_string(), "erin - pending (Dist: 2.30km, ETA 7.0min)");
}

#[test]
fn renders_assignment_banner_with_empty_match_list() {
    let mut renderer = renderer();

    renderer.render(&decode(
        r#"{"status":"matched","matches":[],"ride":{"id":42,"driver":"bob","status":"accepted"}}"#,
    ));

    let view = renderer.view();
    assert_eq!(view.status_text, "matched");
    assert!(view.match_rows.is_empty());
    let banner = view.assignment.as_ref().expect("banner");
    assert_eq!(banner.ride_id, RideId(42));
    assert!(banner.concluded);
    let text = banner.to_string();
    for part in ["bob", "42", "accepted"] {
        assert!(text.contains(part), "{text} should contain {part}");
    }
}

#[test]
fn rendering_twice_is_idempotent() {
    let result = decode(
        r#"{"status":"OPEN","matches":[{"driver__user__username":"alice","status":"PENDING","distance_to_pickup_km":2.3,"eta_to_pickup_min":5},{"driver__user__username":"dave","status":"REJECTED","distance_to_pickup_km":4,"eta_to_pickup_min":9.5}]}"#,
    );
    let mut renderer = renderer();

    renderer.render(&result);
    let first = renderer.view().clone();
    renderer.render(&result);

    assert_eq!(renderer.view(), &first);
    assert_eq!(renderer.view().match_rows.len(), 2);
    assert_eq!(renderer.view().match_rows[1].driver_name, "dave");
}

#[test]
fn newer_result_replaces_match_list_and_keeps_banner() {
    let mut renderer = renderer();
    renderer.render(&decode(
        r#"{"status":"MATCHED","matches":[{"driver__user__username":"alice","status":"ACCEPTED","distance_to_pickup_km":1,"eta_to_pickup_min":2}],"ride":{"id":7,"driver":null,"status":"REQUESTED"}}"#,
    ));
    renderer.render(&decode(r#"{"status":"MATCHED"}"#));

    let view = renderer.view();
    assert!(view.match_rows.is_empty());
    let banner = view.assignment.as_ref().expect("banner survives");
    assert_eq!(banner.driver_name, "unassigned");
    assert!(!banner.concluded);
}

#[test]
fn detached_view_is_never_written() {
    let mut renderer = renderer();
    renderer.view_mut().detached = true;

    renderer.render(&decode(r#"{"status":"OPEN"}"#));

    assert_eq!(renderer.view().status_text, "");
}
