use crate::model::{Classification, ReconSummary, ReconciliationResult};

/// Compute summary statistics from classified results.
pub fn compute_summary(results: &[ReconciliationResult]) -> ReconSummary {
    let mut summary = ReconSummary {
        total: results.len(),
        ..ReconSummary::default()
    };

    for r in results {
        match r.classification {
            Classification::Missing => summary.missing += 1,
            Classification::Mismatched => summary.mismatched += 1,
            Classification::Consistent => summary.consistent += 1,
        }
    }
    summary.discrepancies = summary.missing + summary.mismatched;

    summary
}
