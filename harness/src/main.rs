use clap::{Parser, ValueEnum};
use harness::{builtin_lessons, docgen, runner};
use std::path::Path;
use store::Provider;
use tracing::info;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Runs the datastore pitfalls lessons")]
struct Cli {
    /// Run only lessons whose title or category contains this substring
    /// (case-insensitive)
    #[arg(long)]
    test: Option<String>,

    /// Write LESSONS.md instead of running lessons
    #[arg(long)]
    generate_docs: bool,

    /// Which backing store the lessons should run against
    #[arg(long, value_enum, default_value = "in-memory")]
    provider: ProviderArg,

    /// Additionally print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    InMemory,
    EmbeddedRelational,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::InMemory => Provider::InMemory,
            ProviderArg::EmbeddedRelational => Provider::EmbeddedRelational,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Registration failures abort here, before any lesson runs.
    let registry = builtin_lessons()?;

    if cli.generate_docs {
        docgen::write_docs(&registry, Path::new(docgen::DEFAULT_DOC_PATH))?;
        println!("Wrote {}", docgen::DEFAULT_DOC_PATH);
        return Ok(());
    }

    let provider: Provider = cli.provider.into();
    info!(?provider, "starting lesson run");

    let summary = runner::run_lessons(&registry, cli.test.as_deref(), provider);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
