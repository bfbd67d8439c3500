use crate::demo::{run_demo, run_render, run_suggest, DemoArgs, RenderArgs, SuggestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use collections_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Collections Copilot",
    about = "Serve and exercise the collections suggestion engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank suggestions for a case snapshot stored as JSON
    Suggest(SuggestArgs),
    /// Render a {{1}}..{{5}} message template with positional tokens
    Render(RenderArgs),
    /// Evaluate the built-in sample cases and print their suggestions
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Suggest(args) => run_suggest(args),
        Command::Render(args) => run_render(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_rejects_zero_limit() {
        let parsed = Cli::try_parse_from([
            "collections-ai-api",
            "suggest",
            "--snapshot",
            "case.json",
            "--limit",
            "0",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "collections-ai-api",
            "suggest",
            "--snapshot",
            "case.json",
            "--limit",
            "2",
        ])
        .expect("positive limit parses");
        match parsed.command {
            Some(Command::Suggest(args)) => assert_eq!(args.limit, Some(2)),
            other => panic!("expected suggest command, got {other:?}"),
        }
    }
}
