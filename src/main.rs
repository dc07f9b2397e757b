use clap::Parser;

use changeling::{
    Result,
    cli::{self, Command},
    command,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("changeling")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match &cli_args.command {
        Command::AddChangelogSnippet { pr_number } => {
            command::add_snippet::execute(&cli_args, *pr_number).await?
        }
        Command::Release { output_file } => {
            command::release::execute(&cli_args, output_file.clone()).await?
        }
        Command::SyncLabels => command::sync_labels::execute(&cli_args).await?,
    }

    Ok(())
}
