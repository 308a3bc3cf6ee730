use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use gramspec::spectral::power::STAGNATION_RESIDUAL;
use gramspec::{
    AnalysisConfig, AnalysisSummary, MatrixLoader, MatrixWriter, OrderingVerifier, RayPattern,
    ResidualVerifier, SolverKind, SpectralAnalyzer, SpectrumReport, TomographyConfig,
    TomographyGenerator,
};

const DEFAULT_INPUT: &str = "D.txt";

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug)]
struct AnalyzeOptions {
    input: PathBuf,
    config: AnalysisConfig,
    format: OutputFormat,
    verify: bool,
}

#[derive(Debug)]
struct GenerateOptions {
    config: TomographyConfig,
    output: PathBuf,
}

#[derive(Debug)]
enum Command {
    Analyze(AnalyzeOptions),
    Generate(GenerateOptions),
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    match args.peek().map(String::as_str) {
        Some("generate") => {
            args.next();
            parse_generate(args).map(Command::Generate)
        }
        Some("analyze") => {
            args.next();
            parse_analyze(args).map(Command::Analyze)
        }
        _ => parse_analyze(args).map(Command::Analyze),
    }
}

fn parse_analyze(mut args: impl Iterator<Item = String>) -> Result<AnalyzeOptions> {
    let mut input = None;
    let mut config = AnalysisConfig::default();
    let mut format = OutputFormat::Text;
    let mut verify = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--solver" => {
                let value = args.next().context("--solver needs a value")?;
                config.solver = value.parse::<SolverKind>()?;
            }
            "--format" => {
                format = match args.next().context("--format needs a value")?.as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    other => bail!("Unknown format {other:?} (expected text or json)"),
                };
            }
            "--verify" => verify = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected extra argument: {arg}"),
        }
    }

    Ok(AnalyzeOptions {
        input: input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
        config,
        format,
        verify,
    })
}

fn parse_generate(mut args: impl Iterator<Item = String>) -> Result<GenerateOptions> {
    let mut positional = Vec::new();
    let mut config = TomographyConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                config.seed = value
                    .parse()
                    .with_context(|| format!("invalid seed {value:?}"))?;
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            _ => positional.push(arg),
        }
    }

    let [image_size, cell_size, method, output] = positional.as_slice() else {
        bail!("Usage: gramspec generate <IMAGE_SIZE> <CELL_SIZE> <METHOD> <OUTPUT> [--seed N]");
    };
    config.image_size = image_size
        .parse()
        .with_context(|| format!("invalid image size {image_size:?}"))?;
    config.cell_size = cell_size
        .parse()
        .with_context(|| format!("invalid cell size {cell_size:?}"))?;
    config.pattern = RayPattern::from_method(
        method
            .parse()
            .with_context(|| format!("invalid method {method:?}"))?,
    );

    Ok(GenerateOptions {
        config,
        output: PathBuf::from(output),
    })
}

fn main() -> Result<()> {
    init_logging();
    match parse_args(env::args().skip(1))? {
        Command::Analyze(options) => run_analyze(&options),
        Command::Generate(options) => run_generate(&options),
    }
}

fn run_analyze(options: &AnalyzeOptions) -> Result<()> {
    let matrix = MatrixLoader::from_path(&options.input)
        .with_context(|| format!("load input matrix {:?}", options.input))?;
    info!(
        "Loaded {}x{} matrix from {:?}",
        matrix.rows(),
        matrix.cols(),
        options.input
    );

    let analyzer = SpectralAnalyzer::new(options.config.clone());
    let summary = analyzer.analyze(&matrix)?;

    if options.verify {
        verify_summary(&summary, &options.config)?;
    }

    let report = SpectrumReport::from_summary(&summary);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.format {
        OutputFormat::Text => report.write_text(&mut out)?,
        OutputFormat::Json => report.write_json(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn verify_summary(summary: &AnalysisSummary, config: &AnalysisConfig) -> Result<()> {
    let residual_tolerance = match summary.solver {
        SolverKind::Symmetric => config.tolerance,
        SolverKind::PowerDeflation => config.tolerance.max(STAGNATION_RESIDUAL),
    };
    let ordering = OrderingVerifier::verify(&summary.decomposition, config.tolerance);
    let residual =
        ResidualVerifier::verify(&summary.gram, &summary.decomposition, residual_tolerance);

    for line in ordering.explanation.lines().chain(residual.explanation.lines()) {
        info!("verify: {line}");
    }
    if !(ordering.is_valid && residual.is_valid) {
        warn!("Spectrum verification failed");
        bail!("eigen-decomposition failed verification");
    }
    Ok(())
}

fn run_generate(options: &GenerateOptions) -> Result<()> {
    let matrix = TomographyGenerator::generate(&options.config)?;
    MatrixWriter::write_sparse_to_path(&matrix, &options.output)?;
    info!(
        "Wrote {}x{} matrix to {:?}",
        matrix.rows(),
        matrix.cols(),
        options.output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_arguments_reads_default_file() {
        let Command::Analyze(options) = parse_args(args(&[])).expect("parse") else {
            panic!("expected analyze");
        };
        assert_eq!(options.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(options.config.solver, SolverKind::Symmetric);
        assert!(!options.verify);
    }

    #[test]
    fn analyze_flags_are_applied() {
        let parsed = parse_args(args(&[
            "analyze", "--solver", "power", "--format", "json", "--verify", "m.txt",
        ]))
        .expect("parse");
        let Command::Analyze(options) = parsed else {
            panic!("expected analyze");
        };
        assert_eq!(options.input, PathBuf::from("m.txt"));
        assert_eq!(options.config.solver, SolverKind::PowerDeflation);
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.verify);
    }

    #[test]
    fn generate_reads_positionals_and_seed() {
        let parsed = parse_args(args(&[
            "generate", "8", "2", "300", "out.txt", "--seed", "9",
        ]))
        .expect("parse");
        let Command::Generate(options) = parsed else {
            panic!("expected generate");
        };
        assert_eq!(options.config.image_size, 8);
        assert_eq!(options.config.cell_size, 2);
        assert_eq!(options.config.pattern, RayPattern::Random { rays: 300 });
        assert_eq!(options.config.seed, 9);
        assert_eq!(options.output, PathBuf::from("out.txt"));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(args(&["a.txt", "b.txt"])).is_err());
        assert!(parse_args(args(&["--solver", "qr"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["generate", "8", "2"])).is_err());
    }
}
