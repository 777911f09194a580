use clap::Parser;
use pizzapets_core::fingerprint::hash_for;
use pizzapets_core::{init_logging, Observer};
use pizzapets_io::{compute_history_hash, to_json, FixtureSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "fixture.json")]
    fixture: String,

    #[arg(short, long)]
    inscription: String,

    /// Replay up to this block height instead of the fixture clock
    #[arg(long)]
    height: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging("warn");

    println!("Verifying replay determinism for {}...", args.inscription);

    let mut digests = Vec::new();
    for run in 1..=2 {
        let source = FixtureSource::open(&args.fixture)?;
        let mut observer = Observer::new(source, args.inscription.as_str());
        match args.height {
            Some(height) => observer.update_at(height).await?,
            None => observer.update().await?,
        };
        let Some(pet) = observer.pet() else {
            anyhow::bail!("run {} produced no pet", run);
        };
        let history_hash = compute_history_hash(pet.history())?;
        let state_hash = hash_for(&to_json(&pet.snapshot())?);
        println!("Run {}: state {} history {}", run, state_hash, history_hash);
        digests.push((state_hash, history_hash));
    }

    if digests[0] == digests[1] {
        println!("\n✅ VERIFICATION SUCCESSFUL!");
        Ok(())
    } else {
        println!("\n❌ VERIFICATION FAILED!");
        println!("Two replays over identical inputs diverged.");
        std::process::exit(1);
    }
}
