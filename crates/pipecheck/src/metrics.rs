//! Metrics collection and reporting using metrics-rs.
//!
//! Recording goes through the `metrics` facade and is a no-op unless a
//! recorder is installed; the CLI installs [`CliRecorder`] for `--metrics`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use parking_lot::RwLock;

use crate::{TestOutcome, TestReport};

// ============================================================================
// Metric descriptions
// ============================================================================

/// Register metric descriptions. Call once at startup.
pub fn init() {
    describe_counter!(
        "pipecheck_checks_passed_total",
        Unit::Count,
        "Checks passed, by check kind"
    );
    describe_counter!(
        "pipecheck_checks_failed_total",
        Unit::Count,
        "Checks failed, by check kind"
    );
    describe_counter!(
        "pipecheck_register_mismatches_total",
        Unit::Count,
        "Registers differing between pipeline and reference"
    );
    describe_counter!(
        "pipecheck_missing_logs_total",
        Unit::Count,
        "Log files expected but not found"
    );
    describe_gauge!(
        "pipecheck_pipeline_cycles",
        Unit::Count,
        "Total cycles reported by the pipelined simulator"
    );
    describe_histogram!(
        "pipecheck_parse_seconds",
        Unit::Seconds,
        "Time spent parsing a single log"
    );
}

// ============================================================================
// Metric recording functions
// ============================================================================

/// Record the verdicts of one test.
pub fn record_report(report: &TestReport) {
    if let Some(passed) = report.registers_passed() {
        record_check("registers", passed);
    }
    if let Some(passed) = report.cycles_passed() {
        record_check("cycles", passed);
    }

    match &report.outcome {
        TestOutcome::MissingFiles(paths) => {
            counter!("pipecheck_missing_logs_total").increment(paths.len() as u64);
        }
        TestOutcome::Completed { registers, cycles } => {
            if let Some(check) = registers {
                counter!("pipecheck_register_mismatches_total")
                    .increment(check.differences.len() as u64);
            }
            if let Some(check) = cycles {
                let labels = [("test", report.name.clone())];
                #[allow(clippy::cast_precision_loss)]
                gauge!("pipecheck_pipeline_cycles", &labels).set(check.actual() as f64);
            }
        }
    }
}

fn record_check(kind: &'static str, passed: bool) {
    let labels = [("check", kind)];
    if passed {
        counter!("pipecheck_checks_passed_total", &labels).increment(1);
    } else {
        counter!("pipecheck_checks_failed_total", &labels).increment(1);
    }
}

/// Record how long one log took to parse.
pub fn record_parse(seconds: f64) {
    histogram!("pipecheck_parse_seconds").record(seconds);
}

// ============================================================================
// CLI recorder
// ============================================================================

/// Values of one metric kind, keyed by rendered name and labels.
struct Store<T> {
    values: RwLock<HashMap<String, T>>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> Store<T> {
    fn update(&self, key: &str, f: impl FnOnce(&mut T))
    where
        T: Default,
    {
        let mut values = self.values.write();
        f(values.entry(key.to_string()).or_default());
    }

    fn get(&self, key: &str) -> Option<T> {
        self.values.read().get(key).cloned()
    }

    /// Snapshot sorted by key for printing.
    fn sorted(&self) -> BTreeMap<String, T> {
        self.values
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// A registered metric: its rendered key plus the store it writes to.
struct Slot<T> {
    key: String,
    store: Arc<Store<T>>,
}

impl metrics::CounterFn for Slot<u64> {
    fn increment(&self, value: u64) {
        self.store.update(&self.key, |total| *total += value);
    }

    fn absolute(&self, value: u64) {
        self.store.update(&self.key, |total| *total = value);
    }
}

impl metrics::GaugeFn for Slot<f64> {
    fn increment(&self, value: f64) {
        self.store.update(&self.key, |level| *level += value);
    }

    fn decrement(&self, value: f64) {
        self.store.update(&self.key, |level| *level -= value);
    }

    fn set(&self, value: f64) {
        self.store.update(&self.key, |level| *level = value);
    }
}

impl metrics::HistogramFn for Slot<Vec<f64>> {
    fn record(&self, value: f64) {
        self.store.update(&self.key, |samples| samples.push(value));
    }
}

/// Recorder that keeps a run's metrics in memory for the `--metrics` report.
#[derive(Default)]
pub struct CliRecorder {
    counters: Arc<Store<u64>>,
    gauges: Arc<Store<f64>>,
    histograms: Arc<Store<Vec<f64>>>,
}

impl CliRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the global recorder.
    ///
    /// Returns `None` if another recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = CliRecorderHandle {
            counters: Arc::clone(&self.counters),
            gauges: Arc::clone(&self.gauges),
            histograms: Arc::clone(&self.histograms),
        };
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }
}

/// Render `name{label=value,...}`.
fn key_to_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|label| format!("{}={}", label.key(), label.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

fn slot<T>(key: &Key, store: &Arc<Store<T>>) -> Arc<Slot<T>> {
    Arc::new(Slot {
        key: key_to_string(key),
        store: Arc::clone(store),
    })
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(slot(key, &self.counters))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(slot(key, &self.gauges))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(slot(key, &self.histograms))
    }
}

/// Read access to what an installed [`CliRecorder`] collected.
pub struct CliRecorderHandle {
    counters: Arc<Store<u64>>,
    gauges: Arc<Store<f64>>,
    histograms: Arc<Store<Vec<f64>>>,
}

impl CliRecorderHandle {
    /// Counter total for a rendered key such as
    /// `pipecheck_checks_failed_total{check=registers}`.
    #[must_use]
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.counters.get(key)
    }

    /// Last gauge value, e.g. `pipecheck_pipeline_cycles{test=T.txt}`.
    #[must_use]
    pub fn get_gauge(&self, key: &str) -> Option<f64> {
        self.gauges.get(key)
    }

    /// Samples recorded for a histogram key.
    #[must_use]
    pub fn get_histogram(&self, key: &str) -> Option<Vec<f64>> {
        self.histograms.get(key)
    }

    /// Print the collected metrics after the comparison output.
    pub fn print_summary(&self) {
        let counters = self.counters.sorted();
        let gauges = self.gauges.sorted();
        let histograms = self.histograms.sorted();

        if counters.is_empty() && gauges.is_empty() && histograms.is_empty() {
            println!("No metrics collected.");
            return;
        }

        println!();
        println!("## Metrics Summary");

        if !counters.is_empty() {
            println!();
            println!("### Counters");
            for (key, total) in &counters {
                println!("  {key}: {total}");
            }
        }

        if !gauges.is_empty() {
            println!();
            println!("### Cycle counts");
            for (key, level) in &gauges {
                println!("  {key}: {level}");
            }
        }

        let timings: Vec<_> = histograms
            .iter()
            .filter_map(|(key, samples)| Timing::of(samples).map(|timing| (key, timing)))
            .collect();
        if !timings.is_empty() {
            println!();
            println!("### Parse times");
            for (key, timing) in timings {
                println!(
                    "  {key}: logs={}, min={:.6}s, max={:.6}s, avg={:.6}s",
                    timing.count, timing.min, timing.max, timing.avg
                );
            }
        }
    }
}

/// Aggregate of histogram samples.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Timing {
    count: usize,
    min: f64,
    max: f64,
    avg: f64,
}

impl Timing {
    fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        #[allow(clippy::cast_precision_loss)]
        let avg = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self {
            count: samples.len(),
            min,
            max,
            avg,
        })
    }
}
