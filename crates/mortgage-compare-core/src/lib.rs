pub mod error;
pub mod format;
pub mod mortgage;
pub mod time_value;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::MortgageError;
pub use mortgage::amortization::{AmortizationYear, MortgageResult};
pub use mortgage::scenario::{DownPayment, DownPaymentKind, PaymentFrequency, Scenario};
pub use types::*;

/// Standard result type for all mortgage calculations
pub type CalcResult<T> = Result<T, MortgageError>;
