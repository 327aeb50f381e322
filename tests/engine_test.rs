//! End-to-end query engine tests: search, analysis, and detail lookup
//! over real fixture files.
mod common;

use chrono::FixedOffset;
use common::{RecordBuilder, TranscriptRootBuilder};
use serde_json::json;
use session_search::config::EngineConfig;
use session_search::query::{
    AnalyzeParams, MAX_SEARCH_RESULTS, QueryError, RoleFilter, SearchEngine, SearchParams,
};

fn engine_for(root: &std::path::Path) -> SearchEngine {
    // Pin the assumed-local offset to UTC so tests don't depend on the
    // machine's timezone.
    let config = EngineConfig::new(root.to_path_buf())
        .with_assumed_local_offset(FixedOffset::east_opt(0).unwrap());
    SearchEngine::new(config)
}

/// Five timestamped user messages; index 2 contains the needle.
fn five_message_session() -> TranscriptRootBuilder {
    TranscriptRootBuilder::new().with_session(
        "-home-user-app",
        "session-1",
        &[
            RecordBuilder::user().text("message zero").timestamp("2025-09-13T09:00:00Z"),
            RecordBuilder::assistant().text("message one").timestamp("2025-09-13T09:01:00Z"),
            RecordBuilder::user().text("the needle is here").timestamp("2025-09-13T09:02:00Z"),
            RecordBuilder::assistant().text("message three").timestamp("2025-09-13T09:03:00Z"),
            RecordBuilder::user().text("message four").timestamp("2025-09-13T09:04:00Z"),
        ],
    )
}

#[test]
fn test_search_context_window_clipped_and_flagged() {
    let root = five_message_session().build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("needle");
    params.context_window = 1;
    let report = engine.search(&params).unwrap();

    assert_eq!(report.total_matches, 1);
    assert_eq!(report.results.len(), 1);

    let result = &report.results[0];
    assert_eq!(result.project, "/home/user/app");
    assert_eq!(result.session_id, "session-1");

    // Exactly messages [1, 2, 3], with is_match only on the middle one.
    let window = &result.context_window;
    assert_eq!(window.len(), 3);
    assert_eq!(window[0].content, "message one");
    assert_eq!(window[1].content, "the needle is here");
    assert_eq!(window[2].content, "message three");
    assert_eq!(window.iter().filter(|m| m.is_match).count(), 1);
    assert!(window[1].is_match);
}

#[test]
fn test_search_window_clips_at_session_start() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("needle first").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::assistant().text("after").timestamp("2025-09-13T09:01:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("needle");
    params.context_window = 2;
    let report = engine.search(&params).unwrap();

    let window = &report.results[0].context_window;
    assert_eq!(window.len(), 2);
    assert!(window[0].is_match);
}

#[test]
fn test_search_case_insensitive_by_default() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("FOO uppercase").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::user().text("foo lowercase").timestamp("2025-09-13T09:01:00Z"),
                RecordBuilder::user().text("FoO mixed").timestamp("2025-09-13T09:02:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.search(&SearchParams::new("foo")).unwrap();
    assert_eq!(report.total_matches, 3);

    let mut params = SearchParams::new("foo");
    params.case_sensitive = true;
    let report = engine.search(&params).unwrap();
    assert_eq!(report.total_matches, 1);
}

#[test]
fn test_search_is_literal_not_regex() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("axb").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::user().text("literal a.b match").timestamp("2025-09-13T09:01:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.search(&SearchParams::new("a.b")).unwrap();
    assert_eq!(report.total_matches, 1);
    assert!(report.results[0].match_content.contains("a.b"));
}

#[test]
fn test_search_truncation_reports_original_length() {
    let long_content = format!("needle {}", "x".repeat(1000));
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("before").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::user().text(&long_content).timestamp("2025-09-13T09:01:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("needle");
    params.context_window = 1;
    let report = engine.search(&params).unwrap();
    let result = &report.results[0];

    let original_len = long_content.chars().count();
    assert_eq!(result.match_content_length, original_len);
    assert!(result.match_content.chars().count() <= 303);
    assert!(result.match_content.ends_with("..."));

    let matched_entry = result.context_window.iter().find(|m| m.is_match).unwrap();
    assert_eq!(matched_entry.content_length, original_len);
    assert!(matched_entry.content.chars().count() <= 203);
    assert!(matched_entry.content.ends_with("..."));
}

#[test]
fn test_search_role_filter() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("shared term").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::assistant().text("shared term").timestamp("2025-09-13T09:01:00Z"),
                RecordBuilder::tool().text("shared term").timestamp("2025-09-13T09:02:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("shared");
    params.role_filter = RoleFilter::User;
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);

    params.role_filter = RoleFilter::Assistant;
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);

    // Unrecognized filter strings coerce to Both at the boundary.
    params.role_filter = RoleFilter::from_arg("nonsense");
    assert_eq!(engine.search(&params).unwrap().total_matches, 3);
}

#[test]
fn test_search_time_range_inclusive_bounds() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[RecordBuilder::user().text("the meeting note").timestamp("2025-09-13T09:00:00Z")],
        )
        .build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("meeting");
    params.start_time = Some("2025-09-13T08:00:00Z".to_string());
    params.end_time = Some("2025-09-13T12:00:00Z".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);

    params.end_time = Some("2025-09-13T08:30:00Z".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 0);

    // Inclusive on the exact bound.
    params.end_time = Some("2025-09-13T09:00:00Z".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);
}

#[test]
fn test_search_time_filter_excludes_timestampless_messages() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("dated note").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::user().text("undated note"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    // Without bounds both match.
    assert_eq!(engine.search(&SearchParams::new("note")).unwrap().total_matches, 2);

    let mut params = SearchParams::new("note");
    params.start_time = Some("2025-09-13T00:00:00Z".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);
}

#[test]
fn test_search_malformed_time_bound_is_reported_error() {
    let root = TranscriptRootBuilder::new()
        .with_session("-proj", "s", &[RecordBuilder::user().text("x")])
        .build();
    let engine = engine_for(root.path());

    let mut params = SearchParams::new("x");
    params.start_time = Some("not-a-time".to_string());
    let err = engine.search(&params).unwrap_err();
    assert!(matches!(err, QueryError::InvalidTimeBound { field: "start_time", .. }));
}

#[test]
fn test_search_result_cap_reports_true_total() {
    let records: Vec<RecordBuilder> = (0..25)
        .map(|i| {
            RecordBuilder::user()
                .text(&format!("repeated term number {i}"))
                .timestamp(&format!("2025-09-13T09:{i:02}:00Z"))
        })
        .collect();
    let root = TranscriptRootBuilder::new().with_session("-proj", "busy", &records).build();
    let engine = engine_for(root.path());

    let report = engine.search(&SearchParams::new("repeated term")).unwrap();
    assert_eq!(report.total_matches, 25);
    assert_eq!(report.results.len(), MAX_SEARCH_RESULTS);
}

#[test]
fn test_search_skips_corrupt_sessions() {
    let root = TranscriptRootBuilder::new()
        .with_raw_session("-proj", "garbled", "{{{{ not json\nmore garbage")
        .with_session(
            "-proj",
            "clean",
            &[RecordBuilder::user().text("findable text").timestamp("2025-09-13T09:00:00Z")],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.search(&SearchParams::new("findable")).unwrap();
    assert_eq!(report.total_matches, 1);
    assert_eq!(report.results[0].session_id, "clean");
}

#[test]
fn test_search_missing_root_finds_nothing() {
    let engine = engine_for(std::path::Path::new("/nonexistent/transcripts"));
    let report = engine.search(&SearchParams::new("anything")).unwrap();
    assert_eq!(report.total_matches, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_search_matches_flattened_block_content() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[RecordBuilder::assistant()
                .blocks(json!([
                    {"type": "text", "text": "first half"},
                    {"type": "tool_use", "id": "t1", "name": "run", "input": {}},
                    {"type": "text", "text": "second half"}
                ]))
                .timestamp("2025-09-13T09:00:00Z")],
        )
        .build();
    let engine = engine_for(root.path());

    // Joined with a single space: "first half second half".
    let report = engine.search(&SearchParams::new("half second")).unwrap();
    assert_eq!(report.total_matches, 1);
}

#[test]
fn test_analyze_aggregates_and_previews() {
    let long_text = "y".repeat(250);
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-home-user-app",
            "session-1",
            &[
                RecordBuilder::user().text(&long_text).timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::assistant().text("short reply").timestamp("2025-09-13T09:01:00Z"),
                RecordBuilder::tool().text("tool output").timestamp("2025-09-13T09:02:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.analyze(&AnalyzeParams {
        days_back: 7,
        role_filter: RoleFilter::Both,
        project_filter: None,
        include_tools: false,
    });

    // Tool chatter excluded by default.
    assert_eq!(report.sessions_analyzed, 1);
    assert_eq!(report.total_messages, 2);
    assert_eq!(report.summary.messages_by_role.user, 1);
    assert_eq!(report.summary.messages_by_role.assistant, 1);
    assert_eq!(report.summary.messages_by_role.tool, 0);

    let user_entry = &report.messages[0];
    assert_eq!(user_entry.content_length, 250);
    assert!(user_entry.content_preview.chars().count() <= 103);
    assert!(user_entry.content_preview.ends_with("..."));
    assert_eq!(user_entry.project, "/home/user/app");

    let expected_avg = (250 + "short reply".len()) as f64 / 2.0;
    assert!((report.summary.avg_content_length - expected_avg).abs() < 1e-9);
}

#[test]
fn test_analyze_include_tools_and_tool_filter() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text("ask").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::tool().text("tool output").timestamp("2025-09-13T09:01:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let mut params = AnalyzeParams {
        days_back: 7,
        role_filter: RoleFilter::Both,
        project_filter: None,
        include_tools: true,
    };
    assert_eq!(engine.analyze(&params).total_messages, 2);

    // An explicit tool filter selects tool messages even without the flag.
    params.role_filter = RoleFilter::Tool;
    params.include_tools = false;
    let report = engine.analyze(&params);
    assert_eq!(report.total_messages, 1);
    assert_eq!(report.summary.messages_by_role.tool, 1);
}

#[test]
fn test_analyze_message_index_addresses_full_sequence() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "indexed",
            &[
                RecordBuilder::assistant().text("zeroth").timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::user().text("first").timestamp("2025-09-13T09:01:00Z"),
                RecordBuilder::assistant().text("second").timestamp("2025-09-13T09:02:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.analyze(&AnalyzeParams {
        days_back: 7,
        role_filter: RoleFilter::User,
        project_filter: None,
        include_tools: false,
    });
    assert_eq!(report.total_messages, 1);
    let index = report.messages[0].message_index;
    assert_eq!(index, 1);

    // The index round-trips through detail lookup.
    let details = engine.message_details("indexed", &[index]).unwrap();
    assert_eq!(details.requested_messages.len(), 1);
    assert_eq!(details.requested_messages[0].content, "first");
}

#[test]
fn test_message_details_unknown_session_is_reported_error() {
    let root = TranscriptRootBuilder::new()
        .with_session("-proj", "present", &[RecordBuilder::user().text("x")])
        .build();
    let engine = engine_for(root.path());

    let err = engine.message_details("missing", &[0]).unwrap_err();
    assert!(matches!(err, QueryError::SessionNotFound(_)));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_message_details_drops_out_of_range_indices() {
    let long_text = "z".repeat(800);
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[
                RecordBuilder::user().text(&long_text).timestamp("2025-09-13T09:00:00Z"),
                RecordBuilder::assistant().text("reply").timestamp("2025-09-13T09:01:00Z"),
            ],
        )
        .build();
    let engine = engine_for(root.path());

    let report = engine.message_details("s", &[0, 1, 5, 99]).unwrap();
    assert_eq!(report.total_messages_in_session, 2);
    assert_eq!(report.requested_messages.len(), 2);
    // Details are never truncated.
    assert_eq!(report.requested_messages[0].content.len(), 800);
}

#[test]
fn test_naive_query_bounds_use_assumed_offset() {
    let root = TranscriptRootBuilder::new()
        .with_session(
            "-proj",
            "s",
            &[RecordBuilder::user().text("offset probe").timestamp("2025-09-13T15:30:00Z")],
        )
        .build();

    // Assumed local = UTC-7: a naive 09:00 bound means 16:00 UTC, after
    // the 15:30Z message.
    let config = EngineConfig::new(root.path().to_path_buf())
        .with_assumed_local_offset(FixedOffset::west_opt(7 * 3600).unwrap());
    let engine = SearchEngine::new(config);

    let mut params = SearchParams::new("probe");
    params.start_time = Some("2025-09-13T09:00:00".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 0);

    params.start_time = Some("2025-09-13T08:00:00".to_string());
    assert_eq!(engine.search(&params).unwrap().total_matches, 1);
}
