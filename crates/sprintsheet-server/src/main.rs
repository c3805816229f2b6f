//! `sprintsheet` command line: serve the export endpoint, apply records offline,
//! scaffold workbooks and print export links.

use std::fs;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sprintsheet_core::{scaffold, Dispatcher, Layout, TEAM_STATS_SHEET};
use sprintsheet_grid::{FileBook, Grid, MemoryBook};
use sprintsheet_server::{apply_payload, export_link, router, AppState, Envelope, ServerConfig};
use url::Url;

mod telemetry;

fn store_args() -> [Arg; 2] {
    [
        Arg::new("workbook")
            .long("workbook")
            .env("SPRINTSHEET_WORKBOOK")
            .default_value("team-stats.json")
            .value_parser(value_parser!(PathBuf))
            .help("Workbook JSON file"),
        Arg::new("sheet")
            .long("sheet")
            .env("SPRINTSHEET_SHEET")
            .default_value(TEAM_STATS_SHEET)
            .help("Sheet holding the team stats layout"),
    ]
}

fn payload_arg() -> Arg {
    Arg::new("payload")
        .long("payload")
        .required(true)
        .help("Sprint record JSON file, or - for stdin")
}

fn cli() -> Command {
    Command::new("sprintsheet")
        .version(sprintsheet_server::VERSION)
        .about("Upsert sprint metrics into the team stats workbook")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the export endpoint")
                .args(store_args())
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .env("SPRINTSHEET_BIND")
                        .default_value("127.0.0.1:8080")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address"),
                )
                .arg(
                    Arg::new("lock-timeout-ms")
                        .long("lock-timeout-ms")
                        .env("SPRINTSHEET_LOCK_TIMEOUT_MS")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Longest a request waits for the workbook lock"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Apply one sprint record offline and print the envelope")
                .args(store_args())
                .arg(payload_arg()),
        )
        .subcommand(
            Command::new("init")
                .about("Create a workbook with sprint keys laid out in every window")
                .args(store_args())
                .arg(
                    Arg::new("first")
                        .long("first")
                        .default_value("1")
                        .value_parser(value_parser!(u64))
                        .help("Iteration number of the first key in each window"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing workbook"),
                ),
        )
        .subcommand(
            Command::new("link")
                .about("Print the export link for a sprint record")
                .arg(
                    Arg::new("webhook")
                        .long("webhook")
                        .env("SPRINTSHEET_WEBHOOK")
                        .required(true)
                        .help("Deployed /exec URL"),
                )
                .arg(payload_arg()),
        )
}

fn arg<'a, T>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .with_context(|| format!("missing --{id}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    telemetry::init(matches.get_flag("log-json"))?;

    match matches.subcommand() {
        Some(("serve", args)) => {
            let config = ServerConfig::new()
                .with_bind(*arg::<SocketAddr>(args, "bind")?)
                .with_workbook(arg::<PathBuf>(args, "workbook")?.clone())
                .with_sheet(arg::<String>(args, "sheet")?.clone())
                .with_lock_timeout(Duration::from_millis(*arg::<u64>(args, "lock-timeout-ms")?));
            serve(config).await
        }
        Some(("apply", args)) => apply(
            arg::<PathBuf>(args, "workbook")?,
            arg::<String>(args, "sheet")?,
            arg::<String>(args, "payload")?,
        ),
        Some(("init", args)) => init(
            arg::<PathBuf>(args, "workbook")?,
            arg::<String>(args, "sheet")?,
            *arg::<u64>(args, "first")?,
            args.get_flag("force"),
        ),
        Some(("link", args)) => link(
            arg::<String>(args, "webhook")?,
            arg::<String>(args, "payload")?,
        ),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

fn dispatcher_for(sheet: &str) -> anyhow::Result<Dispatcher> {
    let layout = Layout::team_stats()?.with_sheet_name(sheet);
    Ok(Dispatcher::new(layout))
}

fn read_payload(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut data = String::new();
        std::io::stdin()
            .read_to_string(&mut data)
            .context("reading payload from stdin")?;
        Ok(data)
    } else {
        fs::read_to_string(source).with_context(|| format!("reading payload {source}"))
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let book = FileBook::open(&config.workbook)
        .with_context(|| format!("opening workbook {}", config.workbook.display()))?;
    let state =
        AppState::new(book, dispatcher_for(&config.sheet)?).with_lock_timeout(config.lock_timeout);
    let app = router(state);

    tracing::info!(
        "sprintsheet listening on http://{} (workbook={} sheet={:?} lock_timeout_ms={})",
        config.bind,
        config.workbook.display(),
        config.sheet,
        config.lock_timeout.as_millis()
    );
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn apply(workbook: &Path, sheet: &str, payload: &str) -> anyhow::Result<()> {
    let data = read_payload(payload)?;
    let mut book = FileBook::open(workbook)
        .with_context(|| format!("opening workbook {}", workbook.display()))?;
    let dispatcher = dispatcher_for(sheet)?;

    let envelope = match apply_payload(&mut book, &dispatcher, &data) {
        Ok(outcome) => Envelope::success(outcome.message()),
        Err(err) => err.envelope(),
    };
    println!("{}", serde_json::to_string(&envelope)?);

    std::process::exit(if envelope.is_success() { 0 } else { 1 });
}

fn init(workbook: &Path, sheet: &str, first: u64, force: bool) -> anyhow::Result<()> {
    if workbook.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            workbook.display()
        );
    }
    let layout = Layout::team_stats()?.with_sheet_name(sheet);
    let mut grid = Grid::new();
    scaffold(&mut grid, &layout, first)?;

    FileBook::create(workbook, MemoryBook::new().with_sheet(sheet, grid))
        .with_context(|| format!("creating workbook {}", workbook.display()))?;
    println!("Created {} with sheet '{}'", workbook.display(), sheet);
    Ok(())
}

fn link(webhook: &str, payload: &str) -> anyhow::Result<()> {
    let webhook = Url::parse(webhook).with_context(|| format!("invalid webhook url {webhook}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&read_payload(payload)?).context("payload is not JSON")?;
    println!("{}", export_link(&webhook, &value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let matches = cli().try_get_matches_from(["sprintsheet", "serve"]).unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(
            *arg::<SocketAddr>(args, "bind").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(*arg::<u64>(args, "lock-timeout-ms").unwrap(), 10_000);
        assert_eq!(arg::<String>(args, "sheet").unwrap(), "Team Stats");
    }

    #[test]
    fn apply_requires_payload() {
        assert!(cli().try_get_matches_from(["sprintsheet", "apply"]).is_err());
    }

    #[test]
    fn init_refuses_overflowing_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let matches = cli()
            .try_get_matches_from(["sprintsheet", "init", "--first", "18446744073709551615"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        assert!(init(&path, TEAM_STATS_SHEET, *arg::<u64>(args, "first").unwrap(), false).is_err());
        assert!(!path.exists());

        init(&path, TEAM_STATS_SHEET, 1, false).unwrap();
        assert!(path.exists());
    }
}
