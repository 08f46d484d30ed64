use anyhow::{Context, Result};
use std::env;
use std::fs;

use crate::config::{JournalSettings, TableConfig};
use crate::model::{
    FlowPatch, FlowSeed, FlowState, FlowStatus, InfoUpdate, StatsUpdate, TrafficStats,
};
use crate::shared::SharedTable;
use crate::view::{EditSink, FilterSpec, ListEdit};

/// Sink that narrates edits to stdout, tagged with the view's name.
struct StdoutSink {
    label: &'static str,
}

impl StdoutSink {
    fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl EditSink for StdoutSink {
    fn apply(&mut self, edit: ListEdit) {
        match edit {
            ListEdit::Inserted { start, count } => {
                println!("[{}] inserted start={start} count={count}", self.label);
            }
            ListEdit::Updated { start, count } => {
                println!("[{}] updated start={start} count={count}", self.label);
            }
            ListEdit::Removed { start, count } => {
                println!("[{}] removed start={start} count={count}", self.label);
            }
        }
    }
}

/// Runs a small synthetic capture session against a shared table.
///
/// An optional first argument names a JSON config file; without one, a small
/// demo window is used so rollover actually shows up in the output.
pub fn run() -> Result<()> {
    let config = load_config()?;
    let table = SharedTable::from_config(&config).context("building flow table")?;

    let everything = table.subscribe(FilterSpec::all(), Box::new(StdoutSink::new("all")));
    let active = table.subscribe(
        FilterSpec::all().with_state(FlowState::Active),
        Box::new(StdoutSink::new("active")),
    );

    table.append(vec![
        FlowSeed::new("TCP", "10.0.0.2", 49152, "93.184.216.34", 443),
        FlowSeed::new("TCP", "10.0.0.2", 49153, "142.250.74.46", 443),
        FlowSeed::new("UDP", "10.0.0.2", 53124, "1.1.1.1", 53).with_status(FlowStatus::Closed),
        FlowSeed::new("TCP", "10.0.0.7", 50411, "151.101.1.140", 80),
    ]);

    table.apply_patches(vec![
        FlowPatch::info(
            0,
            InfoUpdate::default()
                .host("example.org")
                .l7_protocol("TLS")
                .encrypted(true),
        ),
        FlowPatch::info(
            1,
            InfoUpdate::default()
                .host("google.com")
                .l7_protocol("TLS")
                .encrypted(true),
        ),
        FlowPatch::stats(
            3,
            StatsUpdate::new(
                1_000,
                TrafficStats {
                    sent_bytes: 1_420,
                    rcvd_bytes: 8_732,
                    sent_pkts: 12,
                    rcvd_pkts: 9,
                },
                FlowStatus::Closed,
            ),
        ),
    ]);

    table.append(vec![
        FlowSeed::new("TCP", "10.0.0.2", 49160, "140.82.121.4", 443),
        FlowSeed::new("TCP", "10.0.0.2", 49161, "13.107.42.14", 443),
        FlowSeed::new("UDP", "10.0.0.9", 40012, "8.8.8.8", 53).with_status(FlowStatus::Closed),
    ]);

    table.set_search(active, Some("example"));

    println!(
        "tracked={} all={} active={}",
        table.len(),
        table.item_count(everything).unwrap_or(0),
        table.item_count(active).unwrap_or(0)
    );
    if let Some(count) = table.item_count(everything) {
        for position in 0..count {
            if let Some(record) = table.item(everything, position) {
                let host = record
                    .info()
                    .map(|info| info.host().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{} {} {}:{} -> {}:{} {:?} {}",
                    record.id(),
                    record.proto(),
                    record.src_addr(),
                    record.src_port(),
                    record.dst_addr(),
                    record.dst_port(),
                    record.status(),
                    host
                );
            }
        }
    }

    for line in table.journal_lines() {
        println!("{line}");
    }
    print!("{}", table.render_metrics());
    Ok(())
}

fn load_config() -> Result<TableConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let text =
                fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
            Ok(TableConfig::from_json(&text)?)
        }
        None => Ok(TableConfig {
            capacity: 6,
            journal: Some(JournalSettings::default()),
        }),
    }
}
