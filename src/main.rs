use clap::Parser;
use std::process::ExitCode;
use webtext::input::{PageEntry, read_page_list};
use webtext::reporter::Reporter;
use webtext::session::WebDriverSession;
use webtext::{Pages, WebTextConfig};

mod args;
use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> webtext::Result<()> {
    let mut config = match &args.config {
        Some(path) => WebTextConfig::from_file(path)?,
        None => WebTextConfig::new(),
    }
    .with_env_overrides();
    args.apply(&mut config);
    config.validate()?;

    let mut entries: Vec<PageEntry> = args.pages.iter().map(|url| PageEntry::new(url)).collect();
    if let Some(path) = &args.input {
        entries.extend(read_page_list(path)?);
    }

    // Open the output before starting the browser so a bad path fails fast
    let mut reporter = Reporter::new(args.output.as_deref(), config.output_format)?;

    let pages = Pages::new(entries)
        .with_config(config.clone())
        .with_mode(args.mode());
    ::log::info!("Visiting {} pages", pages.len());

    let mut session = WebDriverSession::launch(&config).await?;

    let start_time = std::time::Instant::now();
    let result = pages.run(&mut session, &mut reporter).await;

    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    reporter.close()?;

    let processed = result?;
    ::log::info!(
        "Processed {} pages in {:.2} seconds",
        processed,
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
