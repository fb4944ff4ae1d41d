use clap::Parser;
use spendbook::args::{Args, BudgetSubcommand, Command};
use spendbook::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(
            home,
            init_args.categories(),
            init_args.currency_symbol(),
        )
        .await?
        .print(),

        Command::Add(add_args) => {
            let config = commands::load_config(home).await?;
            commands::add(config, add_args.clone()).await?.print()
        }

        Command::Update(update_args) => {
            let config = commands::load_config(home).await?;
            commands::update(config, update_args.clone()).await?.print()
        }

        Command::Delete(delete_args) => {
            let config = commands::load_config(home).await?;
            commands::delete(config, delete_args.id()).await?.print()
        }

        Command::List => commands::list(commands::load_config(home).await?)
            .await?
            .print(),

        Command::Summary => commands::summary(commands::load_config(home).await?)
            .await?
            .print(),

        Command::Budget(budget_args) => {
            let config: Config = commands::load_config(home).await?;
            match budget_args.action() {
                BudgetSubcommand::Set(args) => commands::budget_set(config, args.clone())
                    .await?
                    .print(),
                BudgetSubcommand::Show => commands::budget_show(config).await?.print(),
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
