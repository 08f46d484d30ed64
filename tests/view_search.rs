use std::sync::{Arc, Mutex};

use flowscope::{
    EditSink, FilterSpec, FlowPatch, FlowSeed, FlowState, FlowStatus, FlowTable, InfoUpdate,
    ListEdit, StatsUpdate, TrafficStats, ViewId,
};

struct RecordingSink {
    edits: Arc<Mutex<Vec<ListEdit>>>,
}

impl EditSink for RecordingSink {
    fn apply(&mut self, edit: ListEdit) {
        self.edits.lock().unwrap().push(edit);
    }
}

fn recording_sink() -> (Box<RecordingSink>, Arc<Mutex<Vec<ListEdit>>>) {
    let edits = Arc::new(Mutex::new(Vec::new()));
    (
        Box::new(RecordingSink {
            edits: Arc::clone(&edits),
        }),
        edits,
    )
}

fn take(edits: &Arc<Mutex<Vec<ListEdit>>>) -> Vec<ListEdit> {
    std::mem::take(&mut *edits.lock().unwrap())
}

fn visible_ids(table: &FlowTable, view: ViewId) -> Vec<u64> {
    let count = table.item_count(view).unwrap_or(0);
    (0..count)
        .map(|position| table.item(view, position).expect("visible item").id())
        .collect()
}

fn info_patch(id: u64, host: &str) -> FlowPatch {
    FlowPatch::info(
        id,
        InfoUpdate::default().host(host).l7_protocol("TLS").encrypted(true),
    )
}

/// Eight established flows; ids 3, 5, 6, and 7 get resolved host names.
fn populated_table() -> FlowTable {
    let mut table = FlowTable::new(8);
    table.append(
        (0..8)
            .map(|_| FlowSeed::new("TCP", "10.0.0.2", 49152, "93.184.216.34", 443))
            .collect(),
    );
    table.apply_patches(vec![
        info_patch(3, "orange.example"),
        info_patch(5, "juice.example"),
        info_patch(6, "apple.example"),
        info_patch(7, "orangejuice.example"),
    ]);
    table
}

#[test]
fn search_selects_matching_metadata_in_order() {
    let mut table = populated_table();
    let (sink, edits) = recording_sink();
    let view = table.subscribe(FilterSpec::all(), sink);
    take(&edits);

    assert!(table.set_search(view, Some("orange")));

    assert_eq!(
        take(&edits),
        vec![ListEdit::removed(0, 8), ListEdit::inserted(0, 2)]
    );
    assert_eq!(visible_ids(&table, view), vec![3, 7]);
}

#[test]
fn search_is_case_insensitive_both_sides() {
    let mut table = populated_table();
    table.apply_patches(vec![info_patch(3, "OrangeJuice.Example")]);
    let (sink, edits) = recording_sink();
    let view = table.subscribe(FilterSpec::all(), sink);
    take(&edits);

    table.set_search(view, Some("ORANGE"));
    assert_eq!(visible_ids(&table, view), vec![3, 7]);

    // Protocol tags are searched too.
    table.set_search(view, Some("tls"));
    assert_eq!(visible_ids(&table, view), vec![3, 5, 6, 7]);
}

#[test]
fn flows_without_resolved_info_never_match() {
    let mut table = populated_table();
    let (sink, _edits) = recording_sink();
    let view = table.subscribe(FilterSpec::all().with_search("example"), sink);

    // Ids 0..3 and 4 have no info at all and stay invisible.
    assert_eq!(visible_ids(&table, view), vec![3, 5, 6, 7]);
}

#[test]
fn info_patch_can_unmatch_an_active_search() {
    let mut table = populated_table();
    let (sink, edits) = recording_sink();
    let view = table.subscribe(FilterSpec::all().with_search("orange"), sink);
    assert_eq!(take(&edits), vec![ListEdit::inserted(0, 2)]);

    table.apply_patches(vec![info_patch(3, "lemon.example")]);

    assert_eq!(take(&edits), vec![ListEdit::removed(0, 1)]);
    assert_eq!(visible_ids(&table, view), vec![7]);
}

#[test]
fn clearing_the_search_restores_passthrough() {
    let mut table = populated_table();
    let (sink, edits) = recording_sink();
    let view = table.subscribe(FilterSpec::all().with_search("orange"), sink);
    take(&edits);

    assert!(table.set_search(view, None));

    assert_eq!(
        take(&edits),
        vec![ListEdit::removed(0, 2), ListEdit::inserted(0, 8)]
    );
    assert_eq!(table.item_count(view), Some(8));
    assert_eq!(table.item(view, 0).map(|record| record.id()), Some(0));
}

#[test]
fn search_conjoins_with_the_state_predicate() {
    let mut table = populated_table();
    table.apply_patches(vec![FlowPatch::stats(
        7,
        StatsUpdate::new(1_000, TrafficStats::default(), FlowStatus::Closed),
    )]);

    let (sink, _edits) = recording_sink();
    let view = table.subscribe(
        FilterSpec::all()
            .with_state(FlowState::Active)
            .with_search("orange"),
        sink,
    );

    assert_eq!(visible_ids(&table, view), vec![3]);
}
