pub mod amortization;
pub mod scenario;
