use anyhow::Result;
use clap::Parser;
use foodie_tour::cli::{Command, RootArgs};
use foodie_tour::config::{self, Settings};
use foodie_tour::tour;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    config::load_dotenv();
    let args = RootArgs::parse();

    match args.command {
        Command::Plan(args) => {
            let settings = Settings::from_env()?;
            tour::run_plan(&settings, &args.to_request())
        }
        Command::Status(args) => {
            let settings = Settings::from_env()?;
            tour::run_status(&settings, &args.execution, args.json)
        }
        Command::Render(args) => {
            tour::run_render(&args.input, &args.out, &args.title, args.json).map(|_| ())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
