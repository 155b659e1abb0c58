//! Run a bottle build against the in-memory host and print what it did.

use std::path::PathBuf;
use std::process::ExitCode;

use bottle_engine::{run_script, BuildConfig};
use bottle_types::BuildMode;
use cad_host::MockHost;

const USAGE: &str = r#"bottle-dry-run

USAGE:
  bottle-dry-run [--direct] [--calls] [<config.json>]

OPTIONS:
  --direct     Simulate a direct-modeling design (default: parametric)
  --calls      Print the recorded host call log
  -h, --help   Show this help

Set RUST_LOG to change log verbosity.
"#;

struct Options {
    mode: BuildMode,
    print_calls: bool,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Options>, String> {
    let mut options = Options {
        mode: BuildMode::Parametric,
        print_calls: false,
        config_path: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--direct" => options.mode = BuildMode::Direct,
            "--calls" => options.print_calls = true,
            "-h" | "--help" => return Ok(None),
            other if other.starts_with('-') => {
                return Err(format!("unknown option `{other}`\n\n{USAGE}"));
            }
            path => {
                if options.config_path.is_some() {
                    return Err(format!("only one config path is accepted\n\n{USAGE}"));
                }
                options.config_path = Some(PathBuf::from(path));
            }
        }
    }
    Ok(Some(options))
}

fn load_config(path: Option<&PathBuf>) -> Result<BuildConfig, String> {
    let Some(path) = path else {
        return Ok(BuildConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    BuildConfig::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args()? else {
        println!("{USAGE}");
        return Ok(());
    };
    let config = load_config(options.config_path.as_ref())?;

    let mut host = MockHost::new().with_design_mode(options.mode);
    let result = run_script(&mut host, &config);

    if options.print_calls {
        for (i, call) in host.calls().iter().enumerate() {
            println!("{:>3}  {}", i + 1, call);
        }
    }

    let report = result?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("failed to serialize report: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bottle_engine=info,bottle_ops=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
