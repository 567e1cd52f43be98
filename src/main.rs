use std::process::ExitCode;
use clap::Parser as ClapParser;
use tmox::{Config, TmoxError};

fn main() -> ExitCode {
    let config: Config = Config::parse();
    tmox::init_logging(config.verbose);

    match tmox::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                TmoxError::Syntax => {},
                TmoxError::Runtime(runtime_error) => tmox::report_runtime_error(runtime_error),
                TmoxError::Io(io_error) => eprintln!("Error: {}", io_error),
            }

            ExitCode::from(err.exit_code())
        },
    }
}
