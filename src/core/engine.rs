use super::types::{ChartRow, Projection, ProjectionInput, YearSnapshot};

pub fn project(input: &ProjectionInput) -> Projection {
    let compounds = input.compounds_per_year();
    let mut snapshots = Vec::with_capacity(input.years() as usize + 1);
    let mut balance = input.principal();
    let mut cumulative_contributions = 0.0;
    let mut cumulative_interest = 0.0;

    for year in 0..=input.years() {
        let starting_balance = balance;
        let yearly_contribution =
            input.contribution_amount() * f64::from(input.contributions_per_year());
        let mut yearly_interest = 0.0;

        for _ in 0..compounds {
            let period_rate = (input.annual_rate_percent() / 100.0) / f64::from(compounds);
            let period_contribution = yearly_contribution / f64::from(compounds);
            // Contribution lands first and earns this sub-period's interest.
            let interest = (balance + period_contribution) * period_rate;
            yearly_interest += interest;
            balance += period_contribution + interest;
        }

        cumulative_contributions += yearly_contribution;
        cumulative_interest += yearly_interest;

        snapshots.push(YearSnapshot {
            year,
            starting_balance,
            yearly_contribution,
            yearly_interest,
            cumulative_contributions,
            cumulative_interest,
            ending_balance: balance,
        });
    }

    Projection {
        principal: input.principal(),
        snapshots,
        final_balance: balance,
    }
}

pub fn chart_rows(projection: &Projection) -> Vec<ChartRow> {
    projection
        .snapshots
        .iter()
        .map(|s| ChartRow {
            year: s.year,
            principal: projection.principal.round(),
            contributions: s.cumulative_contributions.round(),
            interest: s.cumulative_interest.round(),
            total: s.ending_balance.round(),
            yearly_interest: s.yearly_interest.round(),
            yearly_contribution: s.yearly_contribution.round(),
            starting_balance: s.starting_balance.round(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InvalidDomainError;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

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

    fn sample_input() -> ProjectionInput {
        ProjectionInput::new(1_000.0, 7.0, 20, 1, 100.0, 12).expect("valid input")
    }

    #[test]
    fn default_scenario_matches_pinned_values() {
        let projection = project(&sample_input());

        assert_eq!(projection.snapshots.len(), 21);
        assert_approx(projection.final_balance, 61_747.449_365_153_23);
        assert_approx(projection.total_contributions(), 25_200.0);
        assert_approx(projection.total_interest(), 35_547.449_365_153_24);

        let first = projection.snapshots[0];
        assert_eq!(first.year, 0);
        assert_approx(first.starting_balance, 1_000.0);
        assert_approx(first.yearly_contribution, 1_200.0);
        assert_approx(first.yearly_interest, 154.0);
        assert_approx(first.ending_balance, 2_354.0);

        let tenth = projection.snapshots[10];
        assert_approx(tenth.starting_balance, 19_707.470_539_572_45);
        assert_approx(tenth.yearly_interest, 1_463.522_937_770_071_6);
        assert_approx(tenth.cumulative_interest, 8_170.993_477_342_521);
        assert_approx(tenth.ending_balance, 22_370.993_477_342_52);

        let last = projection.snapshots[20];
        assert_eq!(last.year, 20);
        assert_approx(last.starting_balance, 56_507.896_602_946_945);
        assert_approx(last.yearly_interest, 4_039.552_762_206_286_4);
        assert_approx(last.ending_balance, projection.final_balance);
    }

    #[test]
    fn monthly_compounding_with_weekly_contributions_matches_pinned_values() {
        let input = ProjectionInput::new(5_000.0, 5.0, 3, 12, 50.0, 52).expect("valid input");
        let projection = project(&input);

        assert_eq!(projection.snapshots.len(), 4);
        assert_approx(projection.snapshots[0].yearly_interest, 327.313_257_133_167_3);
        assert_approx(projection.snapshots[0].ending_balance, 7_927.313_257_133_168);
        assert_approx(projection.snapshots[2].ending_balance, 14_238.902_836_129_946);
        assert_approx(projection.total_interest(), 2_238.895_896_704_447_3);
        assert_approx(projection.final_balance, 17_638.895_896_704_453);
    }

    #[test]
    fn zero_years_still_compounds_year_zero() {
        let input = ProjectionInput::new(1_000.0, 7.0, 0, 1, 100.0, 12).expect("valid input");
        let projection = project(&input);

        assert_eq!(projection.snapshots.len(), 1);
        let only = projection.snapshots[0];
        assert_approx(only.starting_balance, 1_000.0);
        assert_approx(only.yearly_contribution, 1_200.0);
        assert_approx(only.yearly_interest, 154.0);
        assert_approx(projection.final_balance, 2_354.0);
    }

    #[test]
    fn zero_rate_only_accumulates_contributions() {
        let input = ProjectionInput::new(500.0, 0.0, 4, 4, 25.0, 12).expect("valid input");
        let projection = project(&input);

        assert_approx(projection.total_interest(), 0.0);
        assert_approx(projection.total_contributions(), 5.0 * 300.0);
        assert_approx(projection.final_balance, 500.0 + 1_500.0);
    }

    #[test]
    fn contribution_earns_interest_in_its_own_sub_period() {
        let input = ProjectionInput::new(0.0, 10.0, 0, 1, 100.0, 1).expect("valid input");
        let projection = project(&input);

        assert_approx(projection.snapshots[0].yearly_interest, 10.0);
        assert_approx(projection.final_balance, 110.0);
    }

    #[test]
    fn chart_rows_round_and_keep_initial_principal() {
        let projection = project(&sample_input());
        let rows = chart_rows(&projection);

        assert_eq!(rows.len(), projection.snapshots.len());
        assert!(rows.iter().all(|r| r.principal == 1_000.0));
        assert_eq!(rows[0].total, 2_354.0);
        assert_eq!(rows[0].interest, 154.0);
        assert_eq!(rows[1].starting_balance, 2_354.0);
        assert_eq!(rows[20].total, 61_747.0);
        assert_eq!(rows[20].contributions, 25_200.0);
        assert_eq!(rows[20].interest, 35_547.0);
    }

    #[test]
    fn rejects_zero_compounding_and_negative_principal() {
        let err = ProjectionInput::new(1_000.0, 7.0, 20, 0, 100.0, 12).expect_err("must reject");
        assert_eq!(
            err,
            InvalidDomainError::ZeroFrequency {
                field: "compounds per year"
            }
        );

        let err = ProjectionInput::new(-1.0, 7.0, 20, 1, 100.0, 12).expect_err("must reject");
        assert!(matches!(
            err,
            InvalidDomainError::NegativeAmount {
                field: "principal",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_and_oversized_inputs() {
        assert!(ProjectionInput::new(1_000.0, f64::NAN, 20, 1, 0.0, 1).is_err());
        assert!(ProjectionInput::new(1_000.0, 7.0, 20, 1, f64::INFINITY, 1).is_err());
        assert!(ProjectionInput::new(1_000.0, 7.0, 20, 1, -5.0, 1).is_err());
        assert!(ProjectionInput::new(1_000.0, 7.0, 20, 1, 5.0, 0).is_err());
        assert!(matches!(
            ProjectionInput::new(1_000.0, 7.0, 201, 1, 0.0, 1),
            Err(InvalidDomainError::TooManyYears { .. })
        ));
        assert!(matches!(
            ProjectionInput::new(1_000.0, 7.0, 1, 2_000_000, 0.0, 1),
            Err(InvalidDomainError::FrequencyTooLarge { .. })
        ));
        assert!(matches!(
            ProjectionInput::new(1_000.0, 7.0, 200, 10_000, 0.0, 1),
            Err(InvalidDomainError::TooManyPeriods { .. })
        ));
        assert!(ProjectionInput::new(1_000.0, 7.0, 200, 365, 0.0, 52).is_ok());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_snapshots_are_continuous_and_conserve_balance(
            principal in 0u32..1_000_000,
            rate_bp in 0u32..3_000,
            years in 0u32..60,
            compound_index in 0usize..5,
            contribution in 0u32..10_000,
            contribution_index in 0usize..5
        ) {
            let compounds = [1, 2, 4, 12, 365][compound_index];
            let contributions = [1, 2, 4, 12, 52][contribution_index];
            let input = ProjectionInput::new(
                principal as f64,
                rate_bp as f64 / 100.0,
                years,
                compounds,
                contribution as f64,
                contributions,
            ).expect("valid input");
            let projection = project(&input);

            prop_assert_eq!(projection.snapshots.len(), years as usize + 1);
            prop_assert_eq!(projection.snapshots[0].starting_balance, principal as f64);
            prop_assert_eq!(
                projection.final_balance,
                projection.snapshots[years as usize].ending_balance
            );

            for (i, s) in projection.snapshots.iter().enumerate() {
                prop_assert_eq!(s.year as usize, i);
                let expected = s.starting_balance + s.yearly_contribution + s.yearly_interest;
                let tol = 1e-9 * expected.abs().max(1.0);
                prop_assert!(
                    (s.ending_balance - expected).abs() <= tol,
                    "year {}: ending {} vs {}", s.year, s.ending_balance, expected
                );
            }

            for pair in projection.snapshots.windows(2) {
                prop_assert_eq!(pair[1].starting_balance, pair[0].ending_balance);
                prop_assert!(pair[1].cumulative_contributions >= pair[0].cumulative_contributions);
                prop_assert!(pair[1].cumulative_interest >= pair[0].cumulative_interest);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_without_contributions_matches_closed_form(
            principal in 1u32..1_000_000,
            rate_bp in 0u32..2_000,
            years in 0u32..50,
            compound_index in 0usize..5
        ) {
            let compounds = [1u32, 2, 4, 12, 365][compound_index];
            let rate = rate_bp as f64 / 100.0;
            let input = ProjectionInput::new(principal as f64, rate, years, compounds, 0.0, 12)
                .expect("valid input");
            let projection = project(&input);
            let growth = 1.0 + rate / 100.0 / compounds as f64;

            // Snapshot `years` opens after exactly `years` full years of growth.
            let after_years = principal as f64 * growth.powf((compounds * years) as f64);
            let opening = projection.snapshots[years as usize].starting_balance;
            prop_assert!((opening - after_years).abs() <= 1e-8 * after_years.max(1.0));

            let after_all = principal as f64 * growth.powf((compounds * (years + 1)) as f64);
            prop_assert!((projection.final_balance - after_all).abs() <= 1e-8 * after_all.max(1.0));
            prop_assert_eq!(projection.total_contributions(), 0.0);
        }
    }

    #[test]
    fn quarterly_compounding_without_contributions_matches_pinned_value() {
        let input = ProjectionInput::new(10_000.0, 6.0, 10, 4, 0.0, 12).expect("valid input");
        let projection = project(&input);
        assert_approx_tol(projection.final_balance, 19_253.330_191_239_92, 1e-6);
    }
}
