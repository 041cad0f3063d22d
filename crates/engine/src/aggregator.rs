//! Record aggregation by analysis scope.

use costwise_core::{
    AggregatedGroup, AnalysisScope, Error, PerformanceRecord, Result,
};

/// Extract the grouping key for a record under the given scope.
///
/// Records missing the key are a contract violation: the caller validates
/// batches upstream, so the engine fails the whole call rather than
/// silently dropping them.
fn scope_key(record: &PerformanceRecord, scope: AnalysisScope) -> Result<String> {
    match scope {
        AnalysisScope::Model => Ok(record.model.clone()),
        AnalysisScope::Provider => Ok(record.provider.clone()),
        AnalysisScope::Tier => record.tier.clone().ok_or_else(|| {
            Error::invalid_input(format!("record {} has no tier for tier-scoped analysis", record.id))
        }),
        AnalysisScope::Execution => record
            .context
            .as_ref()
            .and_then(|c| c.execution_id.clone())
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "record {} has no execution id for execution-scoped analysis",
                    record.id
                ))
            }),
    }
}

/// Running sums for one partition.
#[derive(Debug, Default)]
struct GroupAccumulator {
    cost_per_request: f64,
    cost_per_1k: f64,
    total_cost: f64,
    token_count: f64,
    latency_p50: f64,
    latency_p95: f64,
    latency_p99: f64,
    latency_avg: f64,
    latency_min: f64,
    latency_max: f64,
    quality_sum: f64,
    quality_count: u64,
    record_count: u64,
}

/// Partition records by scope key and reduce each partition to means.
///
/// Groups come out in first-appearance order, so identical batches always
/// produce identically ordered output. Quality is averaged over the subset
/// of records that report it; a group where no record has quality gets
/// `avg_quality = None`, not zero.
pub fn aggregate(
    records: &[PerformanceRecord],
    scope: AnalysisScope,
) -> Result<Vec<AggregatedGroup>> {
    // Vec-based partition lookup keeps first-appearance order; group counts
    // are bounded by scope cardinality, so the linear scan is fine.
    let mut keys: Vec<String> = Vec::new();
    let mut accumulators: Vec<GroupAccumulator> = Vec::new();
    let mut representatives: Vec<&PerformanceRecord> = Vec::new();

    for record in records {
        let key = scope_key(record, scope)?;
        let idx = match keys.iter().position(|k| *k == key) {
            Some(idx) => idx,
            None => {
                keys.push(key);
                accumulators.push(GroupAccumulator::default());
                representatives.push(record);
                keys.len() - 1
            }
        };

        let acc = &mut accumulators[idx];
        acc.cost_per_request += record.cost.cost_per_request_usd;
        acc.cost_per_1k += record.cost.cost_per_1k_tokens_usd;
        acc.total_cost += record.cost.total_cost_usd;
        acc.token_count += record.cost.token_count as f64;
        acc.latency_p50 += record.latency.p50_ms;
        acc.latency_p95 += record.latency.p95_ms;
        acc.latency_p99 += record.latency.p99_ms;
        acc.latency_avg += record.latency.avg_ms;
        acc.latency_min += record.latency.min_ms;
        acc.latency_max += record.latency.max_ms;
        if let Some(quality) = &record.quality {
            acc.quality_sum += quality.composite_score;
            acc.quality_count += 1;
        }
        acc.record_count += 1;
    }

    if keys.is_empty() {
        // Unreachable given the non-empty precondition at the boundary.
        return Err(Error::insufficient_data(
            "no groups produced from record batch",
        ));
    }

    let groups = keys
        .into_iter()
        .zip(accumulators)
        .zip(representatives)
        .map(|((id, acc), rep)| {
            let n = acc.record_count as f64;
            AggregatedGroup {
                id,
                provider: rep.provider.clone(),
                model: rep.model.clone(),
                tier: rep.tier.clone(),
                avg_cost_per_request_usd: acc.cost_per_request / n,
                avg_cost_per_1k_tokens_usd: acc.cost_per_1k / n,
                avg_total_cost_usd: acc.total_cost / n,
                avg_token_count: acc.token_count / n,
                avg_latency_p50_ms: acc.latency_p50 / n,
                avg_latency_p95_ms: acc.latency_p95 / n,
                avg_latency_p99_ms: acc.latency_p99 / n,
                avg_latency_ms: acc.latency_avg / n,
                avg_latency_min_ms: acc.latency_min / n,
                avg_latency_max_ms: acc.latency_max / n,
                avg_quality: (acc.quality_count > 0)
                    .then(|| acc.quality_sum / acc.quality_count as f64),
                record_count: acc.record_count,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(scope = %scope, groups = groups.len(), "Aggregated record batch");
    Ok(groups)
}
