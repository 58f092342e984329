//! Plain-text renderings of a search outcome.
//!
//! - [`render_report`] - one numbered block per subgroup
//! - [`render_csv`] - `;`-separated table, one row per subgroup
//! - [`render_regression_rows`] - `;`-separated rows with one column per
//!   regression estimator

use std::fmt::Write;

use subgroupforge_scoring::Evaluation;
use subgroupforge_search::{SearchOutcome, Subgroup};

/// Header of [`render_csv`].
pub const CSV_HEADER: &str = "Nr.;Depth;Coverage;Quality;Positives;Conditions;";

/// Human-readable listing of the results, best first.
pub fn render_report(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Resulting subgroups: ");
    for (rank, subgroup) in outcome.results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. (id: {}) {}",
            rank + 1,
            subgroup.signature(),
            subgroup.group()
        );
        let _ = writeln!(out, " \t{}", details(subgroup));
    }
    let _ = writeln!(out);
    write_summary(&mut out, outcome);
    out
}

/// Results as `;`-separated rows under [`CSV_HEADER`].
pub fn render_csv(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{CSV_HEADER}");
    for (rank, subgroup) in outcome.results.iter().enumerate() {
        let positives = subgroup.matrix().map_or(0, |m| m.p);
        let _ = writeln!(
            out,
            "{};{};{};{};{};{};",
            rank + 1,
            subgroup.depth(),
            subgroup.coverage(),
            subgroup.quality(),
            positives,
            subgroup.describe()
        );
    }
    out
}

/// Regression results with the estimator vector spread over columns.
///
/// `regressors` names the non-intercept columns in fit order. Subgroups
/// without a regression evaluation are skipped.
pub fn render_regression_rows(outcome: &SearchOutcome, regressors: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(out, "Nr.;Depth;Coverage;Size;Influence;intercept;");
    for name in regressors {
        let _ = write!(out, "{name};");
    }
    let _ = writeln!(out, "Conditions;");

    for (rank, subgroup) in outcome.results.iter().enumerate() {
        let Evaluation::Regression(regression) = subgroup.evaluation() else {
            continue;
        };
        let _ = write!(
            out,
            "{};{};{};{};{};",
            rank + 1,
            subgroup.depth(),
            regression.coverage,
            regression.size,
            regression.influence
        );
        for estimator in &regression.estimators {
            let _ = write!(out, "{estimator};");
        }
        let _ = writeln!(out, "{};", subgroup.describe());
    }
    out
}

fn details(subgroup: &Subgroup) -> String {
    match subgroup.evaluation() {
        Evaluation::Classification { quality, matrix } => {
            format!("quality={quality} │ coverage={} │ {matrix}", matrix.coverage())
        }
        Evaluation::Regression(regression) => {
            let estimators: Vec<String> =
                regression.estimators.iter().map(|e| format!("{e:.6}")).collect();
            format!(
                "influence={} │ coverage={} │ size={} │ estimators=[{}]",
                regression.influence,
                regression.coverage,
                regression.size,
                estimators.join(", ")
            )
        }
    }
}

fn write_summary(out: &mut String, outcome: &SearchOutcome) {
    let stats = &outcome.statistics;
    let _ = writeln!(
        out,
        "Levels completed: \t{}{}",
        stats.levels_completed,
        if outcome.terminated_early {
            " (terminated early)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        out,
        "Candidates: \t{} generated, {} evaluated, {} accepted",
        stats.candidates_generated, stats.candidates_evaluated, stats.candidates_accepted
    );
    let _ = writeln!(out, "Duration: \t{:.3}s", stats.total_duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use subgroupforge_core::{
        CatalogOptions, Comparison, ConstraintCatalog, Group, MissingValuePolicy, PrimeAllocator,
    };
    use subgroupforge_scoring::{
        score_catalog, Evaluator, RegressionEvaluator, RegressionModel, TargetEvaluator,
        WeightedRelativeAccuracy,
    };
    use subgroupforge_search::{BeamSearch, SearchSettings, SimpleRefinement};
    use subgroupforge_test::{regression_dataset, threshold_dataset};

    fn run(
        data: &subgroupforge_core::Dataset,
        evaluator: &dyn Evaluator,
        min_coverage: u64,
    ) -> SearchOutcome {
        let mut catalog =
            ConstraintCatalog::build(data, &mut PrimeAllocator::new(), CatalogOptions::default());
        score_catalog(evaluator, &mut catalog, data);
        let settings = SearchSettings {
            width: 3,
            min_coverage,
            threads: 1,
            ..SearchSettings::default()
        };
        BeamSearch::new(settings, Box::new(SimpleRefinement))
            .run(data, &catalog, evaluator, Group::root())
            .unwrap()
    }

    fn threshold_outcome() -> SearchOutcome {
        let data = threshold_dataset();
        let target = data.resolve_target(Some("b"), "true", Comparison::Eq).unwrap();
        let evaluator =
            TargetEvaluator::new(target, Box::new(WeightedRelativeAccuracy::default()));
        run(&data, &evaluator, 1)
    }

    #[test]
    fn test_csv_rows() {
        let csv = render_csv(&threshold_outcome());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("1;1;5;0.25;5;x >= 6.0;"));
    }

    #[test]
    fn test_report_lists_ranked_subgroups() {
        let outcome = threshold_outcome();
        let report = render_report(&outcome);
        let first = format!("1. (id: {}) x >= 6.0", outcome.results[0].signature());
        assert!(report.contains(&first));
        assert!(report.contains("p=5 n=0"));
        assert!(report.contains("Levels completed: \t1"));
    }

    #[test]
    fn test_regression_rows() {
        let data = regression_dataset();
        let model = RegressionModel::fit(
            &data,
            "y",
            &["x".to_string()],
            MissingValuePolicy::default(),
            0.0,
        )
        .unwrap();
        let outcome = run(&data, &RegressionEvaluator::new(model), 3);

        let rows = render_regression_rows(&outcome, &["x".to_string()]);
        let mut lines = rows.lines();
        assert_eq!(
            lines.next(),
            Some("Nr.;Depth;Coverage;Size;Influence;intercept;x;Conditions;")
        );
        let first: Vec<&str> = lines.next().unwrap().split(';').collect();
        assert_eq!(first[0], "1");
        assert_eq!(first[2], "10");
        assert_eq!(first.len(), 9);
        assert!(first[7].starts_with("group "));
    }
}
