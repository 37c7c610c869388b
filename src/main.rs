use std::process::ExitCode;

use stream_cli::cli::{self, Runtime};
use stream_cli::error::Error;
use stream_cli::logging::init_tracing;
use stream_cli::output::{self, OutputConfig};
use stream_cli::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let invocation = match cli::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => return report(&e),
    };

    let globals = invocation.globals;
    let no_color = globals.no_color || std::env::var_os("NO_COLOR").is_some();
    init_tracing(globals.verbosity, no_color);
    output::init(OutputConfig {
        quiet: globals.quiet,
        no_color,
    });

    let runtime = Runtime::from_env();
    match cli::execute(&invocation, &runtime).await {
        Ok(outcome) => {
            outcome.render();
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

fn report(err: &Error) -> ExitCode {
    match err {
        // clap renders its own usage errors; help and version go to stdout
        Error::Usage(e) => {
            let _ = e.print();
            if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        other => {
            tracing::debug!(kind = other.kind(), "command failed");
            eprintln!("{} {other}", Style::error("Error:"));
            ExitCode::FAILURE
        }
    }
}
