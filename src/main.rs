use brrtguard::cli::run_cli;
use brrtguard::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }
    let code = run_cli()?;
    std::process::exit(code);
}
