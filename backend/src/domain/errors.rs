//! Error type shared by every ledger operation.

use rust_decimal::Decimal;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    OverAllocation,
    InsufficientFunds,
    Validation,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::OverAllocation => "over_allocation",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::Validation => "validation",
            ErrorKind::Storage => "storage",
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Absent and not-owned records are reported identically
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("pay period overlaps active pay period {existing_id}")]
    PeriodOverlap { existing_id: i64 },

    #[error("budget categories of pay period {period_id} already have transactions")]
    CategoriesInUse { period_id: i64 },

    #[error("balance of budget category {category_id} was modified concurrently")]
    StaleBalance { category_id: i64 },

    #[error("total allocation {allocated} exceeds income {income}")]
    OverAllocation { allocated: Decimal, income: Decimal },

    #[error("insufficient funds: {available} available, {requested} requested")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Failure of one member of a bulk request
    #[error("item {index}: {source}")]
    BatchItem {
        index: usize,
        source: Box<LedgerError>,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str) -> Self {
        LedgerError::NotFound { entity }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn at_index(self, index: usize) -> Self {
        LedgerError::BatchItem {
            index,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::PeriodOverlap { .. }
            | LedgerError::CategoriesInUse { .. }
            | LedgerError::StaleBalance { .. } => ErrorKind::Conflict,
            LedgerError::OverAllocation { .. } => ErrorKind::OverAllocation,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::Validation { .. } => ErrorKind::Validation,
            LedgerError::BatchItem { source, .. } => source.kind(),
            LedgerError::Storage(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_item_reports_inner_kind() {
        let inner = LedgerError::InsufficientFunds {
            available: Decimal::new(1000, 2),
            requested: Decimal::new(2000, 2),
        };
        let wrapped = inner.at_index(3);

        assert_eq!(wrapped.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(
            wrapped.to_string(),
            "item 3: insufficient funds: 10.00 available, 20.00 requested"
        );
    }

    #[test]
    fn test_conflict_variants_share_kind() {
        assert_eq!(LedgerError::PeriodOverlap { existing_id: 1 }.kind(), ErrorKind::Conflict);
        assert_eq!(LedgerError::CategoriesInUse { period_id: 1 }.kind(), ErrorKind::Conflict);
        assert_eq!(LedgerError::StaleBalance { category_id: 1 }.kind(), ErrorKind::Conflict);
        assert_eq!(ErrorKind::OverAllocation.as_str(), "over_allocation");
    }
}
