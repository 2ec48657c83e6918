use std::process::ExitCode;

use cv_scorer_lib::core::commands;
use cv_scorer_lib::core::settings::ScorerSettings;

fn main() -> ExitCode {
    let settings = ScorerSettings::from_env();
    cv_scorer_lib::init_logging(&settings.log_filter);

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let outcome = commands::run(&args, &settings);
    if let Some(stdout) = &outcome.stdout {
        println!("{stdout}");
    }
    if let Some(stderr) = &outcome.stderr {
        eprintln!("{stderr}");
    }

    ExitCode::from(outcome.exit_code)
}
