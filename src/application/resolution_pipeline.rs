//! Resolution Pipeline - Main application use case
//!
//! Turns candidate edge hosts into a published location label:
//! cache lookup, then DoH, then GeoIP, then cache write.
//!
//! All state lives in a single coordinator task. Callers talk to it
//! through an unbounded queue, lookups run on their own tasks and report
//! back through a second queue, so every state transition is applied
//! serially. Store I/O runs on the blocking pool and is awaited in
//! place; the coordinator is the only cache writer.
//!
//! Outcomes are ordered by request: a lookup that finishes after a newer
//! request has already produced a label still refreshes the cache but no
//! longer changes what is displayed.

use crate::domain::entities::{CacheEntry, GeoRecord, ResolutionSnapshot, Transition};
use crate::domain::ports::{DnsResolver, GeoLocator};
use crate::domain::services::{country_labels, now_millis, ResolutionCache};
use crate::domain::value_objects::Host;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Settings for the resolution pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Only hosts containing this suffix are resolved
    pub domain_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            domain_suffix: "googlevideo.com".to_string(),
        }
    }
}

enum Command {
    Candidate {
        host: Host,
        reply: Option<oneshot::Sender<Transition>>,
    },
    Settle(oneshot::Sender<()>),
}

enum LookupOutcome {
    DnsFailed,
    GeoFailed,
    Located(GeoRecord),
}

struct Completion {
    seq: u64,
    host: Host,
    outcome: LookupOutcome,
    reply: Option<oneshot::Sender<Transition>>,
}

/// Handle to the resolution coordinator.
///
/// Cheap to clone. Dropping every handle stops the coordinator once its
/// in-flight lookups have finished.
#[derive(Clone)]
pub struct ResolutionPipeline {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ResolutionSnapshot>,
}

impl ResolutionPipeline {
    /// Start the coordinator on the current Tokio runtime.
    pub fn spawn(
        dns: Arc<dyn DnsResolver>,
        geo: Arc<dyn GeoLocator>,
        cache: ResolutionCache,
        config: PipelineConfig,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(ResolutionSnapshot::default());

        let coordinator = Coordinator {
            dns,
            geo,
            cache,
            domain_suffix: config.domain_suffix,
            commands: commands_rx,
            completions_tx,
            completions: completions_rx,
            snapshots: snapshot_tx,
            state: State::default(),
            in_flight: 0,
            settle_waiters: Vec::new(),
        };
        tokio::spawn(coordinator.run());

        Self {
            commands: commands_tx,
            snapshots: snapshot_rx,
        }
    }

    /// Hand a candidate host to the pipeline without waiting.
    ///
    /// Never blocks and never fails; if the coordinator is gone the host
    /// is dropped.
    pub fn notify(&self, host: Host) {
        if self
            .commands
            .send(Command::Candidate { host, reply: None })
            .is_err()
        {
            tracing::trace!("resolution pipeline stopped, dropping candidate");
        }
    }

    /// Submit a candidate host and wait for the terminal transition of
    /// this invocation.
    pub async fn resolve(&self, host: Host) -> Transition {
        let (tx, rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Candidate {
                host,
                reply: Some(tx),
            })
            .is_err()
        {
            return Transition::Ignored;
        }
        rx.await.unwrap_or(Transition::Ignored)
    }

    /// Wait until every lookup submitted before this call has completed.
    pub async fn settle(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Settle(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Current published state.
    pub fn snapshot(&self) -> ResolutionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to published state changes.
    pub fn subscribe(&self) -> watch::Receiver<ResolutionSnapshot> {
        self.snapshots.clone()
    }
}

#[derive(Default)]
struct State {
    last_host: Option<Host>,
    display_text: String,
    country_code: Option<String>,
    /// Sequence number handed to the most recent cache hit or lookup
    next_seq: u64,
    /// Sequence number of the outcome behind `display_text`
    applied_seq: u64,
    /// Set while the most recent lookup is in flight
    resolving_seq: Option<u64>,
}

impl State {
    fn apply(&mut self, seq: u64, geo: &GeoRecord) {
        self.applied_seq = seq;
        self.display_text = country_labels::display_text(geo);
        self.country_code = Some(geo.country_code.clone());
    }

    fn snapshot(&self) -> ResolutionSnapshot {
        ResolutionSnapshot {
            last_host: self.last_host.clone(),
            display_text: self.display_text.clone(),
            country_code: self.country_code.clone(),
            is_resolving: self.resolving_seq.is_some(),
        }
    }
}

struct Coordinator {
    dns: Arc<dyn DnsResolver>,
    geo: Arc<dyn GeoLocator>,
    cache: ResolutionCache,
    domain_suffix: String,
    commands: mpsc::UnboundedReceiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<ResolutionSnapshot>,
    state: State,
    in_flight: usize,
    settle_waiters: Vec<oneshot::Sender<()>>,
}

impl Coordinator {
    async fn run(mut self) {
        let mut commands_open = true;

        while commands_open || self.in_flight > 0 {
            tokio::select! {
                cmd = self.commands.recv(), if commands_open => match cmd {
                    Some(Command::Candidate { host, reply }) => {
                        self.on_candidate(host, reply).await
                    }
                    Some(Command::Settle(waiter)) => self.on_settle(waiter),
                    None => commands_open = false,
                },
                Some(done) = self.completions.recv() => self.on_completion(done).await,
            }
        }

        tracing::debug!("resolution coordinator stopped");
    }

    async fn on_candidate(&mut self, host: Host, reply: Option<oneshot::Sender<Transition>>) {
        if !host.has_suffix(&self.domain_suffix) {
            Self::reply(reply, Transition::Ignored);
            return;
        }

        let previous = self.state.last_host.replace(host.clone());
        if previous.as_ref() == Some(&host) && !self.state.display_text.is_empty() {
            tracing::trace!("{} already located, skipping", host);
            Self::reply(reply, Transition::Skipped);
            return;
        }

        self.state.next_seq += 1;
        let seq = self.state.next_seq;

        if let Some(entry) = self.cached_location(&host).await {
            tracing::debug!("cache hit for {}: {}", host, entry.geo.country_code);
            self.state.apply(seq, &entry.geo);
            self.state.resolving_seq = None;
            self.publish();
            Self::reply(reply, Transition::CacheHit(entry.geo));
            return;
        }

        self.state.resolving_seq = Some(seq);
        self.in_flight += 1;
        self.publish();

        tracing::debug!("resolving {} (seq={})", host, seq);
        let dns = self.dns.clone();
        let geo = self.geo.clone();
        let completions = self.completions_tx.clone();

        tokio::spawn(async move {
            let outcome = Self::lookup(dns.as_ref(), geo.as_ref(), &host).await;
            let _ = completions.send(Completion {
                seq,
                host,
                outcome,
                reply,
            });
        });
    }

    async fn lookup(dns: &dyn DnsResolver, geo: &dyn GeoLocator, host: &Host) -> LookupOutcome {
        let Some(ip) = dns.resolve_ipv4(host.as_str()).await else {
            return LookupOutcome::DnsFailed;
        };
        match geo.locate(IpAddr::V4(ip)).await {
            Some(record) => LookupOutcome::Located(record),
            None => LookupOutcome::GeoFailed,
        }
    }

    async fn on_completion(&mut self, done: Completion) {
        let Completion {
            seq,
            host,
            outcome,
            reply,
        } = done;

        self.in_flight -= 1;
        if self.state.resolving_seq == Some(seq) {
            self.state.resolving_seq = None;
        }

        let transition = match outcome {
            LookupOutcome::DnsFailed => {
                tracing::debug!("no address for {}", host);
                Transition::DnsFailed
            }
            LookupOutcome::GeoFailed => {
                tracing::debug!("no location for {}", host);
                Transition::GeoFailed
            }
            LookupOutcome::Located(record) => {
                self.store_location(&host, record.clone()).await;
                if seq > self.state.applied_seq {
                    self.state.apply(seq, &record);
                    tracing::info!(
                        "edge host {} located in {} ({})",
                        host,
                        record.country_code,
                        self.state.display_text
                    );
                } else {
                    tracing::debug!("newer result already shown, not displaying {}", host);
                }
                Transition::Resolved(record)
            }
        };

        self.publish();
        Self::reply(reply, transition);

        if self.in_flight == 0 {
            for waiter in self.settle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    async fn cached_location(&self, host: &Host) -> Option<CacheEntry> {
        let cache = self.cache.clone();
        let host = host.clone();
        match tokio::task::spawn_blocking(move || cache.get_valid(&host, now_millis())).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("spawn_blocking error: {:?}", e);
                None
            }
        }
    }

    async fn store_location(&self, host: &Host, record: GeoRecord) {
        let cache = self.cache.clone();
        let host = host.clone();
        if let Err(e) =
            tokio::task::spawn_blocking(move || cache.put(&host, record, now_millis())).await
        {
            tracing::error!("spawn_blocking error: {:?}", e);
        }
    }

    fn on_settle(&mut self, waiter: oneshot::Sender<()>) {
        if self.in_flight == 0 {
            let _ = waiter.send(());
        } else {
            self.settle_waiters.push(waiter);
        }
    }

    fn publish(&self) {
        let next = self.state.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn reply(reply: Option<oneshot::Sender<Transition>>, transition: Transition) {
        if let Some(tx) = reply {
            let _ = tx.send(transition);
        }
    }
}
