use anyhow::{Context, Result};
use clap::Parser;
use e2ml::cli::{Cli, Command, OutputFormat};
use e2ml::config::EvalConfig;
use e2ml::cross_validation::cross_validation;
use e2ml::hypothesis::{
    differences, mc_nemar_test, t_test_one_sample, t_test_paired,
    wilcoxon_signed_rank_test_with_config, z_test_one_sample, DisagreementCounts, TestType,
};
use e2ml::metrics::{confusion_matrix, score_report};
use e2ml::output::{ConfusionReport, Report, TestReport};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<EvalConfig> {
    match &args.config {
        Some(path) => EvalConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EvalConfig::default()),
    }
}

fn run(command: Command, config: &EvalConfig) -> Result<Report> {
    let alpha = config.significance_level;
    let report = match command {
        Command::Confusion { labels, normalize } => {
            let matrix = confusion_matrix(&labels.y_true.0, &labels.y_pred.0, labels.n_classes)?;
            Report::Confusion(ConfusionReport {
                normalize,
                n_classes: matrix.n_classes(),
                matrix: matrix.normalized(normalize),
            })
        }
        Command::Scores { labels } => Report::Scores(score_report(
            &labels.y_true.0,
            &labels.y_pred.0,
            labels.n_classes,
        )?),
        Command::ZTest {
            sample,
            mu0,
            sigma,
            test_type,
        } => {
            let result = z_test_one_sample(&sample.0, mu0, sigma, test_type)?;
            Report::Test(TestReport::new("z-test", test_type, sample.0.len(), result, alpha))
        }
        Command::TTest {
            sample,
            mu0,
            test_type,
        } => {
            let result = t_test_one_sample(&sample.0, mu0, test_type)?;
            Report::Test(TestReport::new("t-test", test_type, sample.0.len(), result, alpha))
        }
        Command::PairedT {
            sample1,
            sample2,
            mu0,
            test_type,
        } => {
            let sample2 = sample2.as_ref().map(|s| s.0.as_slice());
            let result = t_test_paired(&sample1.0, sample2, mu0, test_type)?;
            Report::Test(TestReport::new(
                "paired t-test",
                test_type,
                sample1.0.len(),
                result,
                alpha,
            ))
        }
        Command::Wilcoxon {
            sample1,
            sample2,
            test_type,
        } => {
            let sample2 = sample2.as_ref().map(|s| s.0.as_slice());
            let result =
                wilcoxon_signed_rank_test_with_config(&sample1.0, sample2, test_type, config)?;
            // Zero differences are discarded before ranking
            let n = differences(&sample1.0, sample2)?
                .iter()
                .filter(|&&d| d != 0.0)
                .count();
            Report::Test(TestReport::new(
                "wilcoxon signed-rank",
                test_type,
                n,
                result,
                alpha,
            ))
        }
        Command::Mcnemar {
            y_true,
            y_pred_1,
            y_pred_2,
        } => {
            let counts = DisagreementCounts::new(&y_true.0, &y_pred_1.0, &y_pred_2.0)?;
            let result = mc_nemar_test(&y_true.0, &y_pred_1.0, &y_pred_2.0)?;
            // chi² p-value is an upper-tail probability
            Report::Test(
                TestReport::new("mcnemar", TestType::RightTail, y_true.0.len(), result, alpha)
                    .with_counts(counts),
            )
        }
        Command::Kfold {
            n_samples,
            n_folds,
            seed,
            y,
        } => {
            let y = y.as_ref().map(|labels| labels.0.as_slice());
            Report::Folds(cross_validation(n_samples, n_folds, seed, y)?)
        }
    };
    Ok(report)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!(?config, "loaded evaluation config");

    let format = args.format;
    let report = run(args.command, &config)?;
    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
