use flowscope::{
    CaptureJournal, EditSink, FilterSpec, FlowPatch, FlowSeed, FlowStatus, FlowTable, InfoUpdate,
    JournalLevel, JournalRotation, ListEdit, StatsUpdate, TableConfig, TrafficStats,
};
use serde_json::Value;

struct NullSink;

impl EditSink for NullSink {
    fn apply(&mut self, _edit: ListEdit) {}
}

fn parse(line: &str) -> Value {
    serde_json::from_str(line).expect("journal line is valid json")
}

fn ops(table: &FlowTable) -> Vec<String> {
    table
        .journal_lines()
        .iter()
        .map(|line| parse(line)["op"].as_str().expect("op field").to_owned())
        .collect()
}

#[test]
fn lines_carry_timestamp_level_op_and_detail() {
    let mut journal = CaptureJournal::default();
    journal
        .record(1_724_000_000_000, JournalLevel::Info, "append", "assigned=0..3")
        .expect("record");

    let lines = journal.lines();
    assert_eq!(lines.len(), 1);
    let value = parse(&lines[0]);
    assert_eq!(value["ts_ms"].as_u64(), Some(1_724_000_000_000));
    assert_eq!(value["level"].as_str(), Some("info"));
    assert_eq!(value["op"].as_str(), Some("append"));
    assert_eq!(value["detail"].as_str(), Some("assigned=0..3"));
}

#[test]
fn records_below_the_floor_are_dropped_unserialized() {
    let mut journal = CaptureJournal::default();
    assert_eq!(journal.level(), JournalLevel::Debug);

    journal.set_level(JournalLevel::Info);
    journal
        .record(1, JournalLevel::Debug, "patch", "applied=2")
        .expect("record");
    journal
        .record(2, JournalLevel::Warn, "untracked", "dropped=1")
        .expect("record");

    let lines = journal.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(parse(&lines[0])["op"].as_str(), Some("untracked"));
}

#[test]
fn rotation_seals_segments_and_drops_the_oldest() {
    // A budget smaller than any line forces one line per segment.
    let rotation = JournalRotation::default()
        .with_max_bytes_per_segment(1)
        .with_max_segments(2);
    let mut journal = CaptureJournal::new(rotation);

    for op in ["first", "second", "third", "fourth"] {
        journal.record(0, JournalLevel::Info, op, "").expect("record");
    }

    assert_eq!(journal.segment_count(), 2);
    assert_eq!(journal.line_count(), 2);
    let retained: Vec<String> = journal
        .lines()
        .iter()
        .map(|line| parse(line)["op"].as_str().expect("op field").to_owned())
        .collect();
    assert_eq!(retained, vec!["third", "fourth"]);
}

#[test]
fn table_journals_every_operation() {
    let mut table = FlowTable::new(8).with_journal(CaptureJournal::default());

    let view = table.subscribe(FilterSpec::all(), Box::new(NullSink));
    table.append(vec![
        FlowSeed::new("TCP", "10.0.0.2", 49152, "93.184.216.34", 443),
        FlowSeed::new("UDP", "10.0.0.2", 53124, "9.9.9.9", 53),
    ]);
    table.apply_patches(vec![
        FlowPatch::info(0, InfoUpdate::default().host("example.org")),
        FlowPatch::stats(
            99,
            StatsUpdate::new(5, TrafficStats::default(), FlowStatus::Closed),
        ),
    ]);
    table.set_search(view, Some("example"));
    table.reset();
    table.unsubscribe(view);

    assert_eq!(
        ops(&table),
        vec![
            "subscribe",
            "append",
            "patch",
            "untracked",
            "search",
            "reset",
            "unsubscribe"
        ]
    );

    let lines = table.journal_lines();
    let append = parse(&lines[1]);
    assert_eq!(append["level"].as_str(), Some("info"));
    assert_eq!(
        append["detail"].as_str(),
        Some("assigned=0..2 visible=2 evicted=0 total=2")
    );
    let untracked = parse(&lines[3]);
    assert_eq!(untracked["level"].as_str(), Some("warn"));
    assert_eq!(untracked["detail"].as_str(), Some("dropped=1"));
}

#[test]
fn configured_level_floor_reaches_the_table_journal() {
    let config = TableConfig::from_json(
        r#"{
            "capacity": 8,
            "journal": { "level": "info" }
        }"#,
    )
    .expect("config parses");
    let mut table = FlowTable::from_config(&config).expect("table builds");
    assert_eq!(
        table.journal().map(|journal| journal.level()),
        Some(JournalLevel::Info)
    );

    table.append(vec![FlowSeed::new(
        "TCP",
        "10.0.0.2",
        49152,
        "93.184.216.34",
        443,
    )]);
    table.apply_patches(vec![FlowPatch::info(
        0,
        InfoUpdate::default().host("example.org"),
    )]);

    // The debug-level patch line falls below the configured floor.
    assert_eq!(ops(&table), vec!["append"]);
}

#[test]
fn journaling_is_off_without_a_journal_section() {
    let mut table =
        FlowTable::from_config(&TableConfig::default()).expect("table builds");
    table.append(vec![FlowSeed::new(
        "TCP",
        "10.0.0.2",
        49152,
        "93.184.216.34",
        443,
    )]);

    assert!(table.journal().is_none());
    assert!(table.journal_lines().is_empty());
}
