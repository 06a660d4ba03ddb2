//! OCCI tent command line interface.
//!
//! ```text
//! occi-tent --modules                    list test modules
//! occi-tent --runmod addMixin            run one module as an ad-hoc case
//! occi-tent --list basic                 list the cases of suites/basic.yaml
//! occi-tent --run 2 basic                run one case
//! occi-tent basic                        run the suite, appending to basic.yaml.log
//! ```
//!
//! # Exit Codes
//!
//! - 0: no test case failed
//! - 1: at least one test case failed
//! - 2: configuration or usage error

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use occi_tent::config::load_or_default;
use occi_tent::observability::logging::init_logging;
use occi_tent::registry::listing;
use occi_tent::suite::{load_suite, resolve_suite_path, ConsoleSink, SuiteError, SuiteTotals, TestCase};
use occi_tent::tester::Value;
use occi_tent::{OcciClient, Registry, Tent};

#[derive(Parser, Debug)]
#[command(name = "occi-tent")]
#[command(version, about = "OCCI tent command line interface")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "tent.toml", value_name = "FILE")]
    config: std::path::PathBuf,

    /// List all available test modules
    #[arg(long)]
    modules: bool,

    /// Output format for --modules
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List available test cases from test suite
    #[arg(short, long)]
    list: bool,

    /// Run single test case from test suite; asks for the ID when omitted
    #[arg(short, long, value_name = "ID")]
    run: Option<Option<usize>>,

    /// Run single test module
    #[arg(long, value_name = "MODULE")]
    runmod: Option<String>,

    /// Parameter for --runmod; the value is read as YAML
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param, requires = "runmod")]
    params: Vec<(String, Value)>,

    /// Test suite file, or a suite name inside the suite directory
    suite: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
    let value = Value::from_yaml(yaml).map_err(|e| e.to_string())?;
    Ok((key.trim().to_string(), value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => return Ok(usage_error(e)),
    };
    init_logging(&config.logging.level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        server = %config.server.base_url(),
        "occi-tent starting"
    );

    let registry = Registry::builtin()?;

    if cli.modules {
        match cli.format {
            Format::Text => print!("{}", listing::render_text(&registry)),
            Format::Json => println!("{}", listing::render_json(&registry)?),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let client = OcciClient::new(&config.server)?;
    let tent = Tent::new(client, registry, config.suites.clone());

    if let Some(module) = cli.runmod {
        let case = TestCase::ad_hoc(module, cli.params.into_iter().collect());
        return Ok(finish(tent.run_cases(&[case], &mut ConsoleSink::stdout()).await));
    }

    let Some(suite) = cli.suite else {
        return Ok(usage_error("no test suite file given"));
    };
    let path = match resolve_suite_path(&suite, Path::new(&config.suites.directory)) {
        Ok(path) => path,
        Err(e) => return Ok(usage_error(e)),
    };

    if cli.list || cli.run.is_some() {
        let cases = match load_suite(&path) {
            Ok(cases) => cases,
            Err(e) => return Ok(usage_error(e)),
        };

        let Some(run) = cli.run else {
            print_test_cases(&path, &cases);
            return Ok(ExitCode::SUCCESS);
        };

        let index = match run {
            Some(index) => Some(index),
            None => {
                print_test_cases(&path, &cases);
                prompt_index()?
            }
        };
        let Some(case) = index.and_then(|i| cases.get(i)) else {
            return Ok(usage_error("Invalid test case specification."));
        };

        println!("Running single test.");
        return Ok(finish(
            tent.run_cases(std::slice::from_ref(case), &mut ConsoleSink::stdout())
                .await,
        ));
    }

    Ok(finish(tent.run_suite_file(&path).await))
}

fn print_test_cases(path: &Path, cases: &[TestCase]) {
    println!("Available test cases in `{}`", path.display());
    for (i, case) in cases.iter().enumerate() {
        println!("[{:>2}] {}", i, case.title);
    }
}

fn prompt_index() -> io::Result<Option<usize>> {
    print!("Execute which test? ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().parse().ok())
}

fn finish(result: Result<SuiteTotals, SuiteError>) -> ExitCode {
    match result {
        Ok(totals) if totals.passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => usage_error(e),
    }
}

fn usage_error(message: impl fmt::Display) -> ExitCode {
    eprintln!("error: {}", message);
    ExitCode::from(2)
}
