pub mod order_repository;
pub mod product_repository;

/// Storage-side failures, already stripped of driver detail. "Not found"
/// is not an error at this boundary: lookups return `Option`, deletes
/// report the affected-row count as `bool`.
#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("storage failure: {0}")]
    Storage(String),

    /// The write was rolled back; zero rows were persisted.
    #[error("transaction rolled back: {0}")]
    TransactionAborted(String),

    /// The rollback itself could not be confirmed. Callers must treat
    /// this as requiring reconciliation, not as a clean abort.
    #[error("transaction rollback unconfirmed: {0}")]
    ReconciliationRequired(String),
}
