use consumer_finance_core::interest::{compound, simple};
use consumer_finance_core::pricing::margin;
use consumer_finance_core::time_value;
use consumer_finance_core::CompoundingPeriod;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// APY / compounding
// ===========================================================================

#[test]
fn test_apy_monthly_known_answer() {
    let apy = time_value::annual_percentage_yield(dec!(0.05), CompoundingPeriod::Monthly).unwrap();
    assert!((apy - dec!(0.05116)).abs() < dec!(0.00001), "got {apy}");
}

#[test]
fn test_apy_increases_with_compounding_frequency() {
    let periods = [
        CompoundingPeriod::Biannually,
        CompoundingPeriod::Annually,
        CompoundingPeriod::Semiannually,
        CompoundingPeriod::Quarterly,
        CompoundingPeriod::Bimonthly,
        CompoundingPeriod::Monthly,
        CompoundingPeriod::Semimonthly,
        CompoundingPeriod::Biweekly,
        CompoundingPeriod::Weekly,
        CompoundingPeriod::Daily,
    ];
    let mut previous = dec!(-1);
    for p in periods {
        let apy = time_value::annual_percentage_yield(dec!(6), p).unwrap();
        assert!(apy > previous, "{p} should beat the less frequent period");
        previous = apy;
    }
}

#[test]
fn test_compound_interest_reuses_money_rounding() {
    let out = compound::calculate_compound_interest(&compound::CompoundInterestInput {
        principal: dec!(1000),
        annual_rate: dec!(0.10),
        years: dec!(3),
        period: CompoundingPeriod::Annually,
        rounding_digits: 2,
    })
    .unwrap();
    assert_eq!(out.result.future_value, dec!(1331.00));
    assert_eq!(out.result.future_value.scale(), 2);
    assert_eq!(out.result.interest_earned, dec!(331.00));
}

#[test]
fn test_present_value_inverts_compounding() {
    let fv = time_value::compound_future_value(
        dec!(2000),
        dec!(0.08),
        dec!(5),
        CompoundingPeriod::Annually,
        6,
    )
    .unwrap();
    let pv = time_value::present_value(fv, dec!(0.08), dec!(5), 2).unwrap();
    assert_eq!(pv, dec!(2000.00));
}

// ===========================================================================
// Simple interest
// ===========================================================================

#[test]
fn test_simple_interest_loan_known_answer() {
    let r = simple::simple_interest_loan(dec!(1000), dec!(12), 12, 2);
    assert_eq!(r.total_interest, dec!(120.00));
    assert_eq!(r.total_amount, dec!(1120.00));
    assert_eq!(r.payment, dec!(93.33));
}

#[test]
fn test_simple_interest_loan_months_coerced() {
    let r = simple::simple_interest_loan(dec!(1000), dec!(12), -3, 2);
    assert_eq!(r.months, 1);
    assert_eq!(r.total_interest, dec!(10.00));
}

// ===========================================================================
// Margin / markup
// ===========================================================================

#[test]
fn test_margin_markup_relationship() {
    let out = margin::calculate_margin(&margin::MarginInput {
        cost: dec!(80),
        price: dec!(100),
        rounding_digits: 2,
    })
    .unwrap();
    let m = out.result.margin;
    let k = out.result.markup;
    assert_eq!(m, dec!(0.2));
    assert_eq!(k, dec!(0.25));
    // markup = margin / (1 - margin)
    assert_eq!(k, m / (Decimal::ONE - m));
}
