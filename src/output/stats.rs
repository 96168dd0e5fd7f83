//! Run summary reporting

/// Counts describing one completed harvest run
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    /// Identifiers collected by the paginator
    pub identifiers_collected: usize,

    /// Records successfully fetched (before dedup)
    pub records_fetched: usize,

    /// Records retained after exact-duplicate elimination
    pub records_retained: usize,

    /// Number of batches processed
    pub batch_count: usize,

    /// Wall-clock duration of the run in seconds
    pub elapsed_secs: f64,
}

impl HarvestSummary {
    /// Share of collected identifiers that produced a record
    pub fn fetch_rate(&self) -> f64 {
        if self.identifiers_collected == 0 {
            return 0.0;
        }
        (self.records_fetched as f64 / self.identifiers_collected as f64) * 100.0
    }
}

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Overview:");
    println!("  Identifiers collected: {}", summary.identifiers_collected);
    println!("  Records fetched: {}", summary.records_fetched);
    println!("  Records retained: {}", summary.records_retained);
    println!("  Batches processed: {}", summary.batch_count);
    println!();

    let dropped = summary.identifiers_collected.saturating_sub(summary.records_fetched);
    let duplicates = summary.records_fetched.saturating_sub(summary.records_retained);

    println!("  Dropped after retries: {}", dropped);
    println!("  Exact duplicates removed: {}", duplicates);
    println!();

    println!(
        "Fetch rate: {:.1}% ({} / {} identifiers resolved)",
        summary.fetch_rate(),
        summary.records_fetched,
        summary.identifiers_collected
    );
    println!("Elapsed: {:.2}s", summary.elapsed_secs);
}
