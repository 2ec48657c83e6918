use std::path::Path;

use cv_scorer_lib::core::service::ScoringService;
use cv_scorer_lib::core::settings::ScorerSettings;

fn main() -> anyhow::Result<()> {
    let settings = ScorerSettings::from_env();
    cv_scorer_lib::init_logging(&settings.log_filter);

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: domain_report <path-to-resume.pdf> [domaine]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        std::process::exit(2);
    }

    let domain = args.get(2).map(|value| value.trim()).filter(|value| !value.is_empty());

    let service = ScoringService::new(&settings);
    let report = service.report(path, domain)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
