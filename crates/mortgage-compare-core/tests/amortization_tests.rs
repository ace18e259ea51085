use mortgage_compare_core::mortgage::amortization::{self, amortize, calculate_mortgage};
use mortgage_compare_core::mortgage::scenario::{DownPayment, PaymentFrequency, Scenario};
use mortgage_compare_core::time_value::{annuity_growth, annuity_payment};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_scenario() -> Scenario {
    Scenario {
        purchase_price: dec!(500000),
        down_payment: DownPayment::Amount(dec!(100000)),
        interest_rate: dec!(5.5),
        amortization_period: 25,
        term: 5,
        payment_frequency: PaymentFrequency::Monthly,
        extra_payment: Decimal::ZERO,
        payment_increase: Decimal::ZERO,
        annual_prepayment: Decimal::ZERO,
    }
}

// ===========================================================================
// Payment derivation
// ===========================================================================

#[test]
fn test_annuity_identity_holds() {
    // payment * ((1+r)^n - 1) / r == principal * (1+r)^n
    for freq in [
        PaymentFrequency::Monthly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::Weekly,
    ] {
        let scenario = Scenario {
            payment_frequency: freq,
            ..reference_scenario()
        };
        let result = amortize(&scenario).unwrap();
        let r = amortization::periodic_rate(&scenario);
        let n = 25 * freq.payments_per_year();
        let growth = annuity_growth(r, n).unwrap();

        let lhs = result.payment_amount * (growth - Decimal::ONE) / r;
        let rhs = dec!(400000) * growth;
        assert!(
            (lhs - rhs).abs() < dec!(0.0001),
            "{freq}: {lhs} != {rhs}"
        );
    }
}

#[test]
fn test_reference_example_400k_at_5_5_percent() {
    // 500,000 purchase, 100,000 down, 5.5%, 25-year amortization, monthly.
    let result = amortize(&reference_scenario()).unwrap();
    assert!(
        (result.monthly_payment - dec!(2456.35)).abs() < dec!(0.01),
        "Expected ~2456.35/month, got {}",
        result.monthly_payment
    );

    // Term-end values are taken at payment 60.
    let first_five: Decimal = result.amortization_schedule[..5]
        .iter()
        .map(|y| y.interest_paid)
        .sum();
    assert!((result.total_interest_term - first_five).abs() < dec!(0.000001));
    assert_eq!(
        result.balance_at_end_of_term,
        result.amortization_schedule[4].ending_balance
    );
    assert_eq!(
        result.amortization_schedule[..5]
            .iter()
            .map(|y| y.payments_made)
            .sum::<u32>(),
        60
    );
}

#[test]
fn test_accelerated_biweekly_override() {
    let scenario = Scenario {
        payment_frequency: PaymentFrequency::AcceleratedBiWeekly,
        ..reference_scenario()
    };
    let result = amortize(&scenario).unwrap();

    let monthly = annuity_payment(dec!(400000), dec!(5.5) / dec!(100) / dec!(12), 300).unwrap();
    assert_eq!(result.payment_amount, monthly / dec!(2));

    // Not the true bi-weekly annuity payment.
    let true_biweekly =
        annuity_payment(dec!(400000), dec!(5.5) / dec!(100) / dec!(26), 650).unwrap();
    assert!(result.payment_amount > true_biweekly);
}

#[test]
fn test_monthly_equivalent_by_frequency() {
    for freq in PaymentFrequency::ALL {
        let result = amortize(&Scenario {
            payment_frequency: freq,
            ..reference_scenario()
        })
        .unwrap();
        let expected = if freq == PaymentFrequency::Monthly {
            result.payment_amount
        } else {
            result.payment_amount * Decimal::from(freq.payments_per_year()) / dec!(12)
        };
        assert_eq!(result.monthly_payment, expected, "{freq}");
    }
}

// ===========================================================================
// Schedule shape
// ===========================================================================

#[test]
fn test_zero_rate_scenario() {
    let scenario = Scenario {
        interest_rate: Decimal::ZERO,
        ..reference_scenario()
    };
    let result = amortize(&scenario).unwrap();
    assert_eq!(result.total_interest_lifetime, Decimal::ZERO);
    assert!((result.monthly_payment * dec!(300) - dec!(400000)).abs() < dec!(0.000001));
}

#[test]
fn test_schedule_principal_sums_to_loan() {
    let scenarios = [
        reference_scenario(),
        Scenario {
            extra_payment: dec!(300),
            ..reference_scenario()
        },
        Scenario {
            annual_prepayment: dec!(15),
            payment_frequency: PaymentFrequency::AcceleratedWeekly,
            ..reference_scenario()
        },
    ];

    for scenario in scenarios {
        let result = amortize(&scenario).unwrap();
        let paid: Decimal = result
            .amortization_schedule
            .iter()
            .map(|y| y.principal_paid)
            .sum();
        assert!(
            (paid - dec!(400000)).abs() < dec!(0.01),
            "principal repaid {paid}"
        );
        let last = result.amortization_schedule.last().unwrap();
        assert!(
            last.ending_balance <= Decimal::ZERO
                || result.amortization_schedule.len() == scenario.amortization_period as usize
        );
    }
}

#[test]
fn test_years_are_sequential() {
    let result = amortize(&Scenario {
        extra_payment: dec!(1000),
        ..reference_scenario()
    })
    .unwrap();
    for (i, year) in result.amortization_schedule.iter().enumerate() {
        assert_eq!(year.year, i as u32 + 1);
    }
}

#[test]
fn test_effective_amortization_counts_partial_year() {
    let result = amortize(&Scenario {
        extra_payment: dec!(500),
        ..reference_scenario()
    })
    .unwrap();
    assert_eq!(
        result.effective_amortization,
        Decimal::from(result.total_payments) / dec!(12)
    );
    let last = result.amortization_schedule.last().unwrap();
    assert!(last.payments_made < 12);
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_envelope_metadata() {
    let output = calculate_mortgage(&reference_scenario()).unwrap();
    assert_eq!(output.methodology, "Level-Payment Mortgage Amortization");
    assert!(output.warnings.is_empty());
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    assert_eq!(output.assumptions["term"], 5);
}

#[test]
fn test_negative_principal_rejected() {
    let err = calculate_mortgage(&Scenario {
        purchase_price: dec!(-10),
        down_payment: DownPayment::Amount(Decimal::ZERO),
        ..reference_scenario()
    })
    .unwrap_err();
    assert!(err.to_string().starts_with("Invalid scenario"));
}
