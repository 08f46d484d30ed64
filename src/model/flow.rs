use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the capture side for a single flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStatus {
    Connecting,
    Established,
    Closed,
    Failed,
}

impl FlowStatus {
    /// Collapses the lifecycle status into the coarse state used by filters.
    pub fn state(self) -> FlowState {
        match self {
            FlowStatus::Connecting | FlowStatus::Established => FlowState::Active,
            FlowStatus::Closed => FlowState::Closed,
            FlowStatus::Failed => FlowState::Failed,
        }
    }
}

/// Coarse flow state exposed to filtering and display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    Active,
    Closed,
    Failed,
}

/// Packet and byte counters for one direction pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub sent_bytes: u64,
    pub rcvd_bytes: u64,
    pub sent_pkts: u64,
    pub rcvd_pkts: u64,
}

impl TrafficStats {
    /// Adds another counter set into this one.
    pub fn absorb(&mut self, other: &TrafficStats) {
        self.sent_bytes += other.sent_bytes;
        self.rcvd_bytes += other.rcvd_bytes;
        self.sent_pkts += other.sent_pkts;
        self.rcvd_pkts += other.rcvd_pkts;
    }

    /// Total bytes in both directions.
    pub fn total_bytes(&self) -> u64 {
        self.sent_bytes + self.rcvd_bytes
    }
}

/// Metadata resolved asynchronously after a flow is first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInfo {
    host: String,
    l7_protocol: String,
    encrypted: bool,
}

impl FlowInfo {
    pub fn new(host: impl Into<String>, l7_protocol: impl Into<String>, encrypted: bool) -> Self {
        Self {
            host: host.into(),
            l7_protocol: l7_protocol.into(),
            encrypted,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn l7_protocol(&self) -> &str {
        &self.l7_protocol
    }

    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    /// Case-insensitive substring match over the resolved fields.
    pub fn matches_needle(&self, lowered: &str) -> bool {
        self.host.to_lowercase().contains(lowered)
            || self.l7_protocol.to_lowercase().contains(lowered)
    }

    pub(crate) fn set_host(&mut self, host: String) {
        self.host = host;
    }

    pub(crate) fn set_l7_protocol(&mut self, l7_protocol: String) {
        self.l7_protocol = l7_protocol;
    }

    pub(crate) fn set_encrypted(&mut self, encrypted: bool) {
        self.encrypted = encrypted;
    }
}

/// Producer-side descriptor for a flow about to enter the register.
///
/// The register assigns the id; everything else arrives with the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSeed {
    pub proto: String,
    pub src_addr: String,
    pub src_port: u16,
    pub dst_addr: String,
    pub dst_port: u16,
    pub first_seen_ms: u64,
    pub status: FlowStatus,
}

impl FlowSeed {
    pub fn new(
        proto: impl Into<String>,
        src_addr: impl Into<String>,
        src_port: u16,
        dst_addr: impl Into<String>,
        dst_port: u16,
    ) -> Self {
        Self {
            proto: proto.into(),
            src_addr: src_addr.into(),
            src_port,
            dst_addr: dst_addr.into(),
            dst_port,
            first_seen_ms: 0,
            status: FlowStatus::Established,
        }
    }

    pub fn with_status(mut self, status: FlowStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_first_seen_ms(mut self, first_seen_ms: u64) -> Self {
        self.first_seen_ms = first_seen_ms;
        self
    }
}

/// One tracked flow inside the register.
///
/// The id is immutable and strictly increasing across the register's lifetime;
/// counters, status, and resolved info mutate through patches only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    id: u64,
    proto: String,
    src_addr: String,
    src_port: u16,
    dst_addr: String,
    dst_port: u16,
    first_seen_ms: u64,
    last_seen_ms: u64,
    status: FlowStatus,
    stats: TrafficStats,
    info: Option<FlowInfo>,
}

impl FlowRecord {
    pub(crate) fn from_seed(id: u64, seed: FlowSeed) -> Self {
        Self {
            id,
            proto: seed.proto,
            src_addr: seed.src_addr,
            src_port: seed.src_port,
            dst_addr: seed.dst_addr,
            dst_port: seed.dst_port,
            first_seen_ms: seed.first_seen_ms,
            last_seen_ms: seed.first_seen_ms,
            status: seed.status,
            stats: TrafficStats::default(),
            info: None,
        }
    }

    /// Register-assigned sequence id, unique for the register's lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn proto(&self) -> &str {
        &self.proto
    }

    pub fn src_addr(&self) -> &str {
        &self.src_addr
    }

    pub fn src_port(&self) -> u16 {
        self.src_port
    }

    pub fn dst_addr(&self) -> &str {
        &self.dst_addr
    }

    pub fn dst_port(&self) -> u16 {
        self.dst_port
    }

    pub fn first_seen_ms(&self) -> u64 {
        self.first_seen_ms
    }

    pub fn last_seen_ms(&self) -> u64 {
        self.last_seen_ms
    }

    pub fn status(&self) -> FlowStatus {
        self.status
    }

    /// Coarse state derived from the current status.
    pub fn state(&self) -> FlowState {
        self.status.state()
    }

    pub fn stats(&self) -> &TrafficStats {
        &self.stats
    }

    /// Resolved metadata, present once an info patch has arrived.
    pub fn info(&self) -> Option<&FlowInfo> {
        self.info.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state() == FlowState::Active
    }

    pub(crate) fn apply_stats(&mut self, update: StatsUpdate) {
        self.stats = update.stats;
        self.status = update.status;
        if update.last_seen_ms > self.last_seen_ms {
            self.last_seen_ms = update.last_seen_ms;
        }
    }

    pub(crate) fn apply_info(&mut self, update: InfoUpdate) {
        let info = self.info.get_or_insert_with(FlowInfo::default);
        if let Some(host) = update.host {
            info.set_host(host);
        }
        if let Some(l7_protocol) = update.l7_protocol {
            info.set_l7_protocol(l7_protocol);
        }
        info.set_encrypted(update.encrypted);
    }
}

/// Counter overwrite carried by a stats patch.
///
/// Counters are cumulative on the capture side, so the whole set replaces the
/// stored one rather than adding to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsUpdate {
    pub last_seen_ms: u64,
    pub stats: TrafficStats,
    pub status: FlowStatus,
}

impl StatsUpdate {
    pub fn new(last_seen_ms: u64, stats: TrafficStats, status: FlowStatus) -> Self {
        Self {
            last_seen_ms,
            stats,
            status,
        }
    }
}

/// Metadata merge carried by an info patch. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoUpdate {
    pub host: Option<String>,
    pub l7_protocol: Option<String>,
    pub encrypted: bool,
}

impl InfoUpdate {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn l7_protocol(mut self, l7_protocol: impl Into<String>) -> Self {
        self.l7_protocol = Some(l7_protocol.into());
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }
}
