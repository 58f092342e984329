use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use subgroupforge::console::{self, render_csv, render_regression_rows, render_report};
use subgroupforge::{
    load_arff_file, Comparison, Discovery, LoadOptions, MissingValuePolicy, QualityMeasureConfig,
    QualityMeasureType, RefinementConfig, SearchConfig, TargetConfig, TerminationConfig,
    ThreadCount,
};

#[derive(Parser, Debug)]
#[command(
    name = "subgroupforge",
    version,
    about = "Beam-search subgroup discovery over ARFF datasets"
)]
struct Cli {
    /// ARFF file to search
    #[arg(long)]
    dataset_file: PathBuf,

    /// TOML or YAML search configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target attribute (defaults to the last attribute)
    #[arg(long)]
    target: Option<String>,

    /// Value the target attribute is compared with
    #[arg(long)]
    target_value: Option<String>,

    /// Comparison of the target condition: EQ, NEQ, LTEQ or GTEQ
    #[arg(long)]
    target_comparison: Option<Comparison>,

    /// Number of refinement levels
    #[arg(short, long)]
    depth: Option<usize>,

    /// Beam width
    #[arg(short, long)]
    width: Option<usize>,

    /// Number of subgroups reported
    #[arg(long)]
    set_length: Option<usize>,

    /// Smallest subgroup size, in rows
    #[arg(long)]
    min_group_size: Option<u64>,

    /// Largest subgroup size, as a fraction of all rows
    #[arg(long)]
    max_group_size_fraction: Option<f64>,

    /// Comma-separated attributes to ignore
    #[arg(long, value_delimiter = ',')]
    blacklist: Vec<String>,

    #[arg(long, value_enum)]
    refinement_operator: Option<RefinementArg>,

    #[arg(long, value_enum)]
    quality_measure: Option<MeasureArg>,

    /// Lowest quality a reported subgroup may have
    #[arg(long)]
    min_quality: Option<f64>,

    /// Worker threads; 0 uses one per core
    #[arg(short = 'T', long)]
    threads: Option<usize>,

    /// Stop after this many seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Write `;`-separated results to this file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Read missing numeric values as zero
    #[arg(long)]
    null_is_zero: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RefinementArg {
    /// Every valid extension
    #[value(name = "SRO", alias = "simple")]
    Simple,
    /// Extensions scoring above the floor, best first
    #[value(name = "QRO", alias = "quality")]
    Quality,
    /// Extensions closest to half the dataset first
    #[value(name = "CRO", alias = "coverage")]
    Coverage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MeasureArg {
    #[value(name = "WRA")]
    Wra,
    #[value(name = "SEN")]
    Sensitivity,
    #[value(name = "SPEC")]
    Specificity,
    #[value(name = "X2")]
    ChiSquared,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    console::init();

    let config = build_config(&cli)?;
    let options = LoadOptions::default().with_blacklist(config.blacklist.iter().cloned());
    let dataset = load_arff_file(&cli.dataset_file, &options)
        .with_context(|| format!("failed to load {}", cli.dataset_file.display()))?;

    let outcome = Discovery::new(config.clone())
        .run(&dataset)
        .context("search failed")?;
    print!("{}", render_report(&outcome));

    if let Some(path) = &cli.csv {
        let text = match &config.regression {
            Some(regression) => render_regression_rows(&outcome, &regression.x),
            None => render_csv(&outcome),
        };
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Loads the configuration file, if any, then applies the command-line flags.
fn build_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SearchConfig::new(),
    };

    if cli.target.is_some() || cli.target_value.is_some() || cli.target_comparison.is_some() {
        let current = config.target.clone();
        config.target = TargetConfig {
            attribute: cli.target.clone().or(current.attribute),
            value: cli.target_value.clone().unwrap_or(current.value),
            comparison: cli.target_comparison.unwrap_or(current.comparison),
        };
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(size) = cli.set_length {
        config.result_set_size = size;
    }
    if let Some(min) = cli.min_group_size {
        config.min_coverage = min;
    }
    if let Some(fraction) = cli.max_group_size_fraction {
        config.max_coverage_fraction = fraction;
    }
    config.blacklist.extend(cli.blacklist.iter().cloned());

    if let Some(refinement) = cli.refinement_operator {
        config.refinement = match refinement {
            RefinementArg::Simple => RefinementConfig::Simple,
            RefinementArg::Quality => RefinementConfig::Quality,
            RefinementArg::Coverage => RefinementConfig::Coverage {
                target_fraction: 0.5,
            },
        };
    }
    if let Some(measure) = cli.quality_measure {
        let measure_type = match measure {
            MeasureArg::Wra => QualityMeasureType::Wra,
            MeasureArg::Sensitivity => QualityMeasureType::Sensitivity,
            MeasureArg::Specificity => QualityMeasureType::Specificity,
            MeasureArg::ChiSquared => QualityMeasureType::ChiSquared,
        };
        config.quality_measure = QualityMeasureConfig {
            measure_type,
            minimum: None,
        };
    }
    if let Some(minimum) = cli.min_quality {
        match &mut config.regression {
            Some(regression) => regression.minimum = minimum,
            None => config.quality_measure.minimum = Some(minimum),
        }
    }
    if let Some(threads) = cli.threads {
        config.thread_count = match threads {
            0 => ThreadCount::Auto,
            1 => ThreadCount::None,
            n => ThreadCount::Count(n),
        };
    }
    if let Some(seconds) = cli.time_limit {
        let termination = config.termination.get_or_insert_with(TerminationConfig::default);
        termination.seconds_spent_limit = Some(seconds);
    }
    if cli.null_is_zero {
        config.missing_values = MissingValuePolicy::as_zero();
    }

    config.validate().context("invalid search configuration")?;
    check_blacklist(&config)?;
    Ok(config)
}

/// The loader drops blacklisted attributes, so none of them may be needed by
/// the target or the regression model.
fn check_blacklist(config: &SearchConfig) -> Result<()> {
    let mut reserved: Vec<&str> = config.target.attribute.iter().map(String::as_str).collect();
    if let Some(regression) = &config.regression {
        reserved.push(&regression.y);
        reserved.extend(regression.x.iter().map(String::as_str));
    }
    if let Some(name) = config
        .blacklist
        .iter()
        .find(|name| reserved.contains(&name.as_str()))
    {
        bail!("attribute `{name}` is blacklisted but required by the target or regression model");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["subgroupforge", "--dataset-file", "data.arff"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&parse(&[])).unwrap();
        assert_eq!(config, SearchConfig::new());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "-d", "2", "-w", "5", "--set-length", "7", "--min-group-size", "3",
            "--max-group-size-fraction", "0.5", "--blacklist", "a,b",
            "--refinement-operator", "SRO", "--quality-measure", "X2",
            "--min-quality", "3.84", "-T", "1", "--target", "churn",
            "--target-value", "yes", "--target-comparison", "NEQ", "--null-is-zero",
            "--time-limit", "30",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.width, 5);
        assert_eq!(config.result_set_size, 7);
        assert_eq!(config.min_coverage, 3);
        assert_eq!(config.max_coverage_fraction, 0.5);
        assert_eq!(config.blacklist, vec!["a", "b"]);
        assert_eq!(config.refinement, RefinementConfig::Simple);
        assert_eq!(
            config.quality_measure,
            QualityMeasureConfig::new(QualityMeasureType::ChiSquared, 3.84)
        );
        assert_eq!(config.thread_count, ThreadCount::None);
        assert_eq!(config.target.attribute.as_deref(), Some("churn"));
        assert_eq!(config.target.value, "yes");
        assert_eq!(config.target.comparison, Comparison::Neq);
        assert!(config.missing_values.as_zero);
        assert_eq!(config.time_limit(), Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "depth = 3\nwidth = 4\nblacklist = [\"id\"]").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--config", &path, "-w", "9", "--blacklist", "x"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.width, 9);
        assert_eq!(config.blacklist, vec!["id", "x"]);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(build_config(&parse(&["-d", "0"])).is_err());
    }

    #[test]
    fn test_blacklisted_target_is_rejected() {
        let err = build_config(&parse(&["--target", "churn", "--blacklist", "id,churn"]))
            .unwrap_err();
        assert!(err.to_string().contains("`churn`"));
    }

    #[test]
    fn test_blacklisted_regression_attribute_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[regression]\ny = \"price\"\nx = [\"area\"]\nminimum = 0.0").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(build_config(&parse(&["--config", &path, "--blacklist", "area"])).is_err());
        assert!(build_config(&parse(&["--config", &path, "--blacklist", "price"])).is_err());
        assert!(build_config(&parse(&["--config", &path, "--blacklist", "id"])).is_ok());
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let argv = ["subgroupforge", "--dataset-file", "d.arff", "--refinement-operator", "XRO"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
