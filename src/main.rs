use anyhow::{Context, Result};
use clap::Parser;
use pizzapets_core::init_logging;
use pizzapets_io::FixtureSource;
use pizzapets_lib::{OutputFormat, Runner, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Runner settings file
    #[arg(short, long, default_value = "pizzapets.toml")]
    config: String,

    /// Fixture file to replay from
    #[arg(short, long)]
    fixture: Option<String>,

    /// Inscription id of the pet
    #[arg(short, long)]
    inscription: Option<String>,

    /// Replay up to this block height instead of the source clock
    #[arg(long)]
    height: Option<u64>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Keep polling the source and re-run whenever the clock moves
    #[arg(short, long)]
    watch: bool,

    /// Append history entries to this JSON-lines file
    #[arg(long)]
    history_out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(&args.config)?;
    if let Some(fixture) = args.fixture {
        settings.fixture = fixture;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if args.history_out.is_some() {
        settings.history_out = args.history_out;
    }
    settings.validate()?;
    init_logging(&settings.log_level);

    let inscription_id = args
        .inscription
        .or_else(|| settings.inscription_id.clone())
        .context("no inscription id given (--inscription or inscription_id in settings)")?;
    let source = FixtureSource::open(&settings.fixture)?;
    let format = settings.format;
    let mut runner = Runner::new(source, &inscription_id, settings)?;

    if args.watch {
        tracing::info!(inscription_id = %inscription_id, "Watching pet");
        runner
            .watch(None, |report| match report.render(format) {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("Render error: {e}"),
            })
            .await?;
    } else if let Some(report) = runner.run_once(args.height).await? {
        println!("{}", report.render(format)?);
    }

    Ok(())
}
