use proclog::cli::{build_cli, parse_config, run};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments first
    let matches = build_cli().get_matches();
    let config = match parse_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // A logger that can't be built leaves nothing to report through
    if let Err(e) = proclog::try_init(&config) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    let logger = proclog::current_logger();
    run(&matches, &logger, std::io::stdin().lock())?;
    logger.sync()?;

    Ok(())
}
