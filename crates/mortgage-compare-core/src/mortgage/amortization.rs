//! Amortization engine: turns a [`Scenario`] into a payment amount and a
//! year-by-year schedule of principal, interest and balance.
//!
//! Interest accrues per payment period at `annual_rate / payments_per_year`.
//! Accelerated frequencies charge a fixed fraction of the monthly payment
//! rather than an annuity recomputed at the true period count, which is what
//! shortens their payoff time. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::MortgageError;
use crate::format::{round_money, round_years};
use crate::mortgage::scenario::{PaymentFrequency, Scenario};
use crate::time_value::annuity_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Totals for one year of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    /// Principal repaid this year, including extra payments and prepayments.
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// Portion of `principal_paid` that came from extra payments and prepayments.
    pub extra_payments: Money,
    pub ending_balance: Money,
    /// Regular payments made this year; short in the payoff year.
    pub payments_made: u32,
}

/// Everything derived from one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    /// Regular payment per period at the scenario's frequency.
    pub payment_amount: Money,
    /// Payment expressed per month, for comparing across frequencies.
    pub monthly_payment: Money,
    /// Principal financed.
    pub total_mortgage: Money,
    pub total_interest_term: Money,
    pub total_interest_lifetime: Money,
    pub balance_at_end_of_term: Money,
    /// Actual payoff time in years given extra payments and prepayments.
    pub effective_amortization: Years,
    /// Regular payments actually made until payoff.
    pub total_payments: u32,
    pub amortization_schedule: Vec<AmortizationYear>,
}

impl MortgageResult {
    /// Copy with money rounded to cents and years to two decimals, for display.
    pub fn rounded(&self) -> MortgageResult {
        MortgageResult {
            payment_amount: round_money(self.payment_amount),
            monthly_payment: round_money(self.monthly_payment),
            total_mortgage: round_money(self.total_mortgage),
            total_interest_term: round_money(self.total_interest_term),
            total_interest_lifetime: round_money(self.total_interest_lifetime),
            balance_at_end_of_term: round_money(self.balance_at_end_of_term),
            effective_amortization: round_years(self.effective_amortization),
            total_payments: self.total_payments,
            amortization_schedule: self
                .amortization_schedule
                .iter()
                .map(|y| AmortizationYear {
                    year: y.year,
                    principal_paid: round_money(y.principal_paid),
                    interest_paid: round_money(y.interest_paid),
                    extra_payments: round_money(y.extra_payments),
                    ending_balance: round_money(y.ending_balance),
                    payments_made: y.payments_made,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project a scenario into its payment, totals and yearly schedule.
pub fn amortize(scenario: &Scenario) -> CalcResult<MortgageResult> {
    project(scenario).map(|(result, _)| result)
}

/// Project a scenario and wrap the result in the standard output envelope.
pub fn calculate_mortgage(scenario: &Scenario) -> CalcResult<ComputationOutput<MortgageResult>> {
    let start = Instant::now();
    let (result, warnings) = project(scenario)?;
    let methodology = if scenario.payment_frequency.is_accelerated() {
        "Accelerated Mortgage Amortization (fraction of monthly payment)"
    } else {
        "Level-Payment Mortgage Amortization"
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, scenario, warnings, elapsed, result))
}

/// Periodic interest rate for the scenario's payment frequency.
pub fn periodic_rate(scenario: &Scenario) -> Rate {
    let ppy = Decimal::from(scenario.payment_frequency.payments_per_year());
    scenario.interest_rate / dec!(100) / ppy
}

/// Regular payment per period, before any payment increase.
///
/// Accelerated frequencies take the monthly annuity payment and divide it
/// by 2 (biweekly) or 4 (weekly); all others use the annuity formula at the
/// frequency's own period count.
pub fn payment_amount(scenario: &Scenario) -> CalcResult<Money> {
    let principal = scenario.principal();
    let years = scenario.amortization_period;

    match scenario.payment_frequency.accelerated_divisor() {
        Some(divisor) => {
            let monthly_rate = scenario.interest_rate / dec!(100) / dec!(12);
            let monthly = annuity_payment(principal, monthly_rate, years * 12)?;
            Ok(monthly / Decimal::from(divisor))
        }
        None => {
            let ppy = scenario.payment_frequency.payments_per_year();
            annuity_payment(principal, periodic_rate(scenario), years * ppy)
        }
    }
}

/// Express a per-period payment as a monthly amount.
pub fn monthly_equivalent(payment: Money, frequency: PaymentFrequency) -> CalcResult<Money> {
    match frequency {
        PaymentFrequency::Monthly => Ok(payment),
        other => checked(
            payment.checked_mul(Decimal::from(other.payments_per_year())),
            "monthly equivalent payment",
        )
        .map(|annual| annual / dec!(12)),
    }
}

fn checked(value: Option<Decimal>, context: &str) -> CalcResult<Decimal> {
    value.ok_or_else(|| MortgageError::Overflow {
        context: context.into(),
    })
}

// ---------------------------------------------------------------------------
// Schedule generation
// ---------------------------------------------------------------------------

fn project(scenario: &Scenario) -> CalcResult<(MortgageResult, Vec<String>)> {
    scenario.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let frequency = scenario.payment_frequency;
    let ppy = frequency.payments_per_year();
    let principal = scenario.principal();
    let rate = periodic_rate(scenario);
    let payment = payment_amount(scenario)?;
    let adjusted_payment = checked(
        payment.checked_mul(Decimal::ONE + scenario.payment_increase / dec!(100)),
        "increased payment",
    )?;
    let prepayment = principal * scenario.annual_prepayment / dec!(100);

    let term = scenario.effective_term();
    if term < scenario.term {
        warnings.push(format!(
            "Term of {} years exceeds the {}-year amortization period; term-end values use year {}",
            scenario.term, scenario.amortization_period, term
        ));
    }

    let first_interest = checked(principal.checked_mul(rate), "first-period interest")?;
    let first_outlay = checked(
        adjusted_payment.checked_add(scenario.extra_payment),
        "first-period payment",
    )?;
    if principal > Decimal::ZERO && first_outlay <= first_interest {
        warnings.push(
            "Regular payment does not cover first-period interest; the balance will grow".into(),
        );
    }

    debug!(
        %principal,
        %rate,
        %payment,
        frequency = frequency.as_str(),
        "derived regular payment"
    );

    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_payments: u32 = 0;
    let mut term_snapshot: Option<(Money, Money)> = None;
    let mut schedule = Vec::with_capacity(scenario.amortization_period as usize);

    for year in 1..=scenario.amortization_period {
        let mut principal_paid = Decimal::ZERO;
        let mut interest_paid = Decimal::ZERO;
        let mut extra_payments = Decimal::ZERO;
        let mut payments_made: u32 = 0;

        for period in 1..=ppy {
            if balance <= Decimal::ZERO {
                break;
            }

            let interest = checked(balance.checked_mul(rate), "periodic interest")?;
            let mut principal_component =
                checked(adjusted_payment.checked_sub(interest), "principal component")?
                    .min(balance);

            if scenario.extra_payment > Decimal::ZERO {
                let room = checked(balance.checked_sub(principal_component), "balance")?;
                let extra = scenario.extra_payment.min(room);
                principal_component += extra;
                extra_payments = checked(extra_payments.checked_add(extra), "extra payments")?;
            }

            // Negative amortization grows the balance every period
            balance = checked(balance.checked_sub(principal_component), "balance")?;
            principal_paid = checked(
                principal_paid.checked_add(principal_component),
                "principal paid",
            )?;
            interest_paid = checked(interest_paid.checked_add(interest), "interest paid")?;
            total_interest = checked(total_interest.checked_add(interest), "total interest")?;
            payments_made += 1;
            total_payments += 1;

            if year == term && period == ppy {
                term_snapshot = Some((balance, total_interest));
            }
        }

        if prepayment > Decimal::ZERO && balance > Decimal::ZERO {
            let lump = prepayment.min(balance);
            balance -= lump;
            principal_paid += lump;
            extra_payments += lump;
        }

        schedule.push(AmortizationYear {
            year,
            principal_paid,
            interest_paid,
            extra_payments,
            ending_balance: balance,
            payments_made,
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    let (balance_at_end_of_term, total_interest_term) = match term_snapshot {
        Some(snapshot) => snapshot,
        None => {
            // Paid off before the term's final payment: report the payoff point.
            if principal > Decimal::ZERO {
                let payoff_year = schedule.last().map(|y| y.year).unwrap_or_default();
                warnings.push(format!(
                    "Mortgage is paid off in year {payoff_year}, before the end of the \
                     {term}-year term; term-end values reflect the payoff point"
                ));
            }
            (balance.max(Decimal::ZERO), total_interest)
        }
    };

    for w in &warnings {
        warn!("{w}");
    }

    let effective_amortization = Decimal::from(total_payments) / Decimal::from(ppy);

    debug!(
        years = schedule.len(),
        total_payments,
        %total_interest,
        "amortization schedule complete"
    );

    Ok((
        MortgageResult {
            payment_amount: payment,
            monthly_payment: monthly_equivalent(payment, frequency)?,
            total_mortgage: principal,
            total_interest_term,
            total_interest_lifetime: total_interest,
            balance_at_end_of_term,
            effective_amortization,
            total_payments,
            amortization_schedule: schedule,
        },
        warnings,
    ))
}
