use cashshop_domain::{
    AccountId, CompartmentId, Currency, ErrorCode, ItemId, LookupError, UnknownCurrency,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Failures of an orchestrated workflow. Business variants map to their own
/// error code; everything else is reported as UNKNOWN_ERROR.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{currency:?} balance {balance} is below price {price}")]
    InsufficientFunds {
        currency: Currency,
        balance: u32,
        price: u32,
    },
    #[error("compartment {0} is full")]
    InventoryFull(CompartmentId),
    #[error("capacity {capacity} + {amount} exceeds the slot ceiling")]
    MaxSlots { capacity: u32, amount: u32 },
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("item {0} is already reserved")]
    ItemAlreadyReserved(ItemId),
    #[error(transparent)]
    UnknownCurrency(#[from] UnknownCurrency),
    #[error("invalid inventory type: {0}")]
    InvalidInventoryType(String),
    #[error("compartment not found: {0}")]
    CompartmentNotFound(String),
    #[error("wallet not found for account {0}")]
    WalletNotFound(AccountId),
    #[error("asset creation failed: {0}")]
    AssetCreationFailed(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::InsufficientFunds { .. } => ErrorCode::NotEnoughCash,
            WorkflowError::InventoryFull(_) => ErrorCode::InventoryFull,
            WorkflowError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            WorkflowError::ItemAlreadyReserved(_) => ErrorCode::ItemAlreadyReserved,
            WorkflowError::AssetCreationFailed(_) => ErrorCode::AssetCreationFailed,
            WorkflowError::MaxSlots { .. }
            | WorkflowError::UnknownCurrency(_)
            | WorkflowError::InvalidInventoryType(_)
            | WorkflowError::CompartmentNotFound(_)
            | WorkflowError::WalletNotFound(_)
            | WorkflowError::Lookup(_)
            | WorkflowError::Internal(_) => ErrorCode::UnknownError,
        }
    }

    /// Expected outcomes that do not indicate a fault in this service.
    pub fn is_business(&self) -> bool {
        !matches!(
            self,
            WorkflowError::Lookup(_) | WorkflowError::Internal(_)
        )
    }
}
