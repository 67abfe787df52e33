//! Financial derivation logic

use std::fmt;

use crate::models::{BreakEvenInputs, FieldGroup, MarginInputs, Plan, StartupCosts, FIELDS};

/// Payback periods beyond this many months get a warning in the summary
pub const LONG_PAYBACK_MONTHS: f64 = 12.0;

const MARGIN_BAR_WIDTH: usize = 20;

/// Coerce raw field text to a number.
///
/// Empty text, text that fails to parse, and non-finite values all
/// coerce to 0. Never fails; every aggregation goes through here.
pub fn to_num(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Total startup investment: the sum of all eleven cost fields
pub fn total_startup_cost(costs: &StartupCosts) -> f64 {
    [
        &costs.transfer_fee,
        &costs.rent_deposit,
        &costs.tech_fee,
        &costs.decoration,
        &costs.ad,
        &costs.equipment,
        &costs.first_materials,
        &costs.three_month_rent,
        &costs.salary,
        &costs.marketing,
        &costs.reserve,
    ]
    .iter()
    .map(|raw| to_num(raw))
    .sum()
}

/// Gross margin per unit as a ratio.
///
/// Returns 0 when the price is not positive. A loss-making unit also
/// reports 0 rather than a negative ratio; only the lower bound is
/// clamped.
pub fn gross_margin(margin: &MarginInputs) -> f64 {
    let price = to_num(&margin.price);
    if price <= 0.0 {
        return 0.0;
    }
    let unit_cost = to_num(&margin.food_cost) + to_num(&margin.packaging);
    ((price - unit_cost) / price).max(0.0)
}

/// Daily revenue needed to cover daily operating costs at the given
/// margin. Returns 0 when the margin is not positive.
pub fn break_even_point(inputs: &BreakEvenInputs, gross_margin: f64) -> f64 {
    let daily_costs = to_num(&inputs.daily_rent)
        + to_num(&inputs.daily_salary)
        + to_num(&inputs.energy)
        + to_num(&inputs.other);
    if gross_margin <= 0.0 {
        return 0.0;
    }
    daily_costs / gross_margin
}

/// Sunk setup cost recouped by the payback period: technology fee,
/// decoration, advertising, equipment. Deposits, rent, materials,
/// salary, marketing and reserve are working capital, not sunk cost.
pub fn fixed_cost_for_payback(costs: &StartupCosts) -> f64 {
    to_num(&costs.tech_fee)
        + to_num(&costs.decoration)
        + to_num(&costs.ad)
        + to_num(&costs.equipment)
}

/// Months until monthly profit recoups the fixed setup cost.
/// Returns 0 when profit is not positive ("not yet computable").
pub fn payback_months(fixed_cost: f64, monthly_profit: f64) -> f64 {
    if monthly_profit <= 0.0 {
        return 0.0;
    }
    fixed_cost / monthly_profit
}

/// All derived metrics for one plan snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PlanMetrics {
    pub plan_name: String,
    pub total_startup_cost: f64,
    pub gross_margin: f64,
    pub break_even_point: f64,
    pub fixed_cost_for_payback: f64,
    pub payback_months: f64,
}

/// Derive every metric from the current input snapshot.
///
/// Pure and cheap, so callers re-derive the full set after every field
/// edit instead of caching anything.
pub fn evaluate(plan: &Plan) -> PlanMetrics {
    let total = total_startup_cost(&plan.costs);
    let margin = gross_margin(&plan.margin);
    let break_even = break_even_point(&plan.break_even, margin);
    let fixed = fixed_cost_for_payback(&plan.costs);
    let payback = payback_months(fixed, to_num(&plan.monthly_profit));

    PlanMetrics {
        plan_name: plan.name.clone(),
        total_startup_cost: total,
        gross_margin: margin,
        break_even_point: break_even,
        fixed_cost_for_payback: fixed,
        payback_months: payback,
    }
}

fn margin_bar(gross_margin: f64) -> String {
    let filled = (gross_margin.clamp(0.0, 1.0) * MARGIN_BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(MARGIN_BAR_WIDTH - filled))
}

fn margin_grade(gross_margin: f64) -> &'static str {
    if gross_margin >= 0.6 {
        "healthy"
    } else if gross_margin >= 0.5 {
        "fair"
    } else {
        "low"
    }
}

impl fmt::Display for PlanMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Investment Summary ===")?;
        writeln!(f, "Plan: {}", self.plan_name)?;
        writeln!(f)?;

        writeln!(f, "Total startup investment:  ¥{:.0}", self.total_startup_cost)?;
        writeln!(
            f,
            "Gross margin:              {} {:.1}% ({})",
            margin_bar(self.gross_margin),
            self.gross_margin * 100.0,
            margin_grade(self.gross_margin),
        )?;
        writeln!(f, "Daily break-even revenue:  ¥{:.2}", self.break_even_point)?;
        writeln!(f, "Fixed cost for payback:    ¥{:.0}", self.fixed_cost_for_payback)?;

        if self.payback_months > 0.0 {
            writeln!(f, "Payback period:            {:.1} months", self.payback_months)?;
            if self.payback_months > LONG_PAYBACK_MONTHS {
                writeln!(
                    f,
                    "  warning: payback exceeds {:.0} months, consider cutting fixed costs or raising the margin",
                    LONG_PAYBACK_MONTHS
                )?;
            }
        } else {
            writeln!(f, "Payback period:            — (enter a positive monthly profit)")?;
        }

        Ok(())
    }
}

/// Format every input field with its coerced value, grouped the way the
/// fields are entered
pub fn format_inputs(plan: &Plan) -> String {
    let mut output = String::new();
    let mut current_group: Option<FieldGroup> = None;

    for spec in FIELDS {
        if current_group != Some(spec.group) {
            output.push_str(&format!("{}:\n", spec.group.title()));
            current_group = Some(spec.group);
        }
        let raw = plan.field(spec.key).unwrap_or("");
        output.push_str(&format!("  {:<28} ¥{:.0}\n", spec.label, to_num(raw)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn margin(price: &str, food_cost: &str, packaging: &str) -> MarginInputs {
        MarginInputs {
            price: price.to_string(),
            food_cost: food_cost.to_string(),
            packaging: packaging.to_string(),
        }
    }

    /// The worked example: a small snack shop
    fn demo_plan() -> Plan {
        let mut plan = Plan::new("demo");
        for (key, value) in [
            ("transfer-fee", "5000"),
            ("tech-fee", "3000"),
            ("decoration", "8000"),
            ("ad", "2000"),
            ("equipment", "4000"),
            ("price", "20"),
            ("food-cost", "6"),
            ("packaging", "2"),
            ("daily-rent", "100"),
            ("daily-salary", "150"),
            ("energy", "20"),
            ("other", "10"),
            ("monthly-profit", "3000"),
        ] {
            plan.set_field(key, value).unwrap();
        }
        plan
    }

    #[test]
    fn coercion_maps_empty_and_malformed_to_zero() {
        assert_approx(to_num(""), 0.0);
        assert_approx(to_num("   "), 0.0);
        assert_approx(to_num("abc"), 0.0);
        assert_approx(to_num("12abc"), 0.0);
        assert_approx(to_num("1,200"), 0.0);
        assert_approx(to_num("inf"), 0.0);
        assert_approx(to_num("NaN"), 0.0);
    }

    #[test]
    fn coercion_parses_plain_numbers() {
        assert_approx(to_num("0"), 0.0);
        assert_approx(to_num("1200"), 1200.0);
        assert_approx(to_num("12.5"), 12.5);
        assert_approx(to_num("-300"), -300.0);
        assert_approx(to_num(" 42 "), 42.0);
        assert_approx(to_num("1e3"), 1000.0);
    }

    #[test]
    fn total_is_the_sum_of_all_eleven_fields() {
        let mut costs = StartupCosts::default();
        assert_approx(total_startup_cost(&costs), 0.0);

        costs.transfer_fee = "100".to_string();
        costs.rent_deposit = "200".to_string();
        costs.tech_fee = "300".to_string();
        costs.decoration = "400".to_string();
        costs.ad = "500".to_string();
        costs.equipment = "600".to_string();
        costs.first_materials = "700".to_string();
        costs.three_month_rent = "800".to_string();
        costs.salary = "900".to_string();
        costs.marketing = "1000".to_string();
        costs.reserve = "1100".to_string();
        assert_approx(total_startup_cost(&costs), 6600.0);
    }

    #[test]
    fn total_skips_malformed_fields() {
        let costs = StartupCosts {
            transfer_fee: "5000".to_string(),
            decoration: "about 8000".to_string(),
            ..StartupCosts::default()
        };
        assert_approx(total_startup_cost(&costs), 5000.0);
    }

    #[test]
    fn gross_margin_is_zero_without_a_positive_price() {
        assert_approx(gross_margin(&margin("", "30", "10")), 0.0);
        assert_approx(gross_margin(&margin("0", "30", "10")), 0.0);
        assert_approx(gross_margin(&margin("-5", "30", "10")), 0.0);
    }

    #[test]
    fn gross_margin_typical_case() {
        assert_approx(gross_margin(&margin("100", "30", "10")), 0.6);
        assert_approx(gross_margin(&margin("20", "6", "2")), 0.6);
    }

    #[test]
    fn gross_margin_clamps_losses_to_zero() {
        assert_approx(gross_margin(&margin("10", "9", "5")), 0.0);
    }

    #[test]
    fn gross_margin_stays_within_unit_interval() {
        for (p, fc, pk) in [
            ("100", "0", "0"),
            ("100", "100", "0"),
            ("3.5", "1.2", "0.8"),
            ("1", "0.99", "0.02"),
        ] {
            let m = gross_margin(&margin(p, fc, pk));
            assert!((0.0..=1.0).contains(&m), "margin {m} out of range");
        }
    }

    #[test]
    fn break_even_divides_daily_costs_by_margin() {
        let inputs = BreakEvenInputs {
            daily_rent: "200".to_string(),
            daily_salary: "150".to_string(),
            energy: "100".to_string(),
            other: "50".to_string(),
        };
        assert_approx(break_even_point(&inputs, 0.5), 1000.0);
    }

    #[test]
    fn break_even_is_zero_without_a_positive_margin() {
        let inputs = BreakEvenInputs {
            daily_rent: "500".to_string(),
            ..BreakEvenInputs::default()
        };
        assert_approx(break_even_point(&inputs, 0.0), 0.0);
        assert_approx(break_even_point(&inputs, -0.1), 0.0);
    }

    #[test]
    fn fixed_cost_ignores_working_capital_fields() {
        let mut costs = StartupCosts {
            tech_fee: "3000".to_string(),
            decoration: "8000".to_string(),
            ad: "2000".to_string(),
            equipment: "4000".to_string(),
            ..StartupCosts::default()
        };
        let before = fixed_cost_for_payback(&costs);
        assert_approx(before, 17000.0);

        costs.rent_deposit = "99999".to_string();
        costs.salary = "12345".to_string();
        costs.three_month_rent = "30000".to_string();
        costs.reserve = "5000".to_string();
        assert_approx(fixed_cost_for_payback(&costs), before);
    }

    #[test]
    fn payback_months_typical_case() {
        assert_approx(payback_months(12000.0, 2000.0), 6.0);
    }

    #[test]
    fn payback_is_zero_without_a_positive_profit() {
        assert_approx(payback_months(17000.0, 0.0), 0.0);
        assert_approx(payback_months(17000.0, -500.0), 0.0);
    }

    #[test]
    fn evaluate_is_pure_over_a_fixed_snapshot() {
        let plan = demo_plan();
        let first = evaluate(&plan);
        let second = evaluate(&plan);
        assert_eq!(first, second);
    }

    #[test]
    fn evaluate_end_to_end_demo_plan() {
        let metrics = evaluate(&demo_plan());
        assert_approx(metrics.total_startup_cost, 22000.0);
        assert_approx(metrics.gross_margin, 0.6);
        assert_approx_tol(metrics.break_even_point, 466.67, 0.01);
        assert_approx(metrics.fixed_cost_for_payback, 17000.0);
        assert_approx_tol(metrics.payback_months, 5.67, 0.01);
    }

    #[test]
    fn summary_rounds_the_way_the_report_promises() {
        let rendered = evaluate(&demo_plan()).to_string();
        assert!(rendered.contains("¥22000"));
        assert!(rendered.contains("60.0%"));
        assert!(rendered.contains("¥466.67"));
        assert!(rendered.contains("¥17000"));
        assert!(rendered.contains("5.7 months"));
        assert!(!rendered.contains("warning"));
    }

    #[test]
    fn summary_warns_on_long_payback() {
        let mut plan = demo_plan();
        plan.set_field("monthly-profit", "1000").unwrap();
        let rendered = evaluate(&plan).to_string();
        assert!(rendered.contains("17.0 months"));
        assert!(rendered.contains("warning"));
    }

    #[test]
    fn summary_shows_placeholder_until_profit_is_positive() {
        let mut plan = demo_plan();
        plan.set_field("monthly-profit", "").unwrap();
        let rendered = evaluate(&plan).to_string();
        assert!(rendered.contains("—"));
        assert!(!rendered.contains("months\n"));
    }

    #[test]
    fn input_listing_groups_and_coerces() {
        let listing = format_inputs(&demo_plan());
        assert!(listing.contains("Startup costs:"));
        assert!(listing.contains("Unit margin:"));
        assert!(listing.contains("Daily break-even:"));
        assert!(listing.contains("Payback:"));
        assert!(listing.contains("Decoration"));
        assert!(listing.contains("¥8000"));
        // unset fields list as zero
        assert!(listing.contains("Reserve fund"));
        assert!(listing.contains("¥0"));
    }
}
