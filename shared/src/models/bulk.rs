//! Bulk operation accounting
//!
//! A bulk tag operation applies one add/remove across a set of object ids
//! and reports partial failure as the normal case.

use serde::{Deserialize, Serialize};

/// Outcome of a bulk tag operation.
///
/// Invariants: `success + failed` equals the number of ids processed
/// (after de-duplication and size-cap truncation), and `errors` holds
/// exactly the `failed` ids, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<u64>,
}

impl BulkReport {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, id: u64) {
        self.failed += 1;
        self.errors.push(id);
    }

    /// Number of ids this report accounts for
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounting_invariants_hold() {
        let mut report = BulkReport::default();
        report.record_success();
        report.record_failure(7);
        report.record_success();
        report.record_failure(9);

        assert_eq!(report.processed(), 4);
        assert_eq!(report.failed, report.errors.len());
        assert_eq!(report.errors, vec![7, 9]);
    }
}
