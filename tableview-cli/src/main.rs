//! `tableview`: browse and edit a remote paginated table from the terminal.

mod args;
mod error;
mod input;
mod paths;
mod sink;
mod view;

use std::fs;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::error;
use log::info;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use tableview_lib::GridConfig;
use tableview_lib::form::SubmitOutcome;
use tableview_lib::grid::Column;
use tableview_lib::grid::FormTarget;
use tableview_lib::grid::Grid;
use tableview_lib::grid::ReloadOutcome;
use tableview_lib::model::FormErrorPayload;
use tableview_lib::model::RecordId;
use tableview_lib::transport::HttpTransport;

use crate::args::Cli;
use crate::args::Command;
use crate::args::FormInputs;
use crate::error::CliError;
use crate::sink::ExitSink;
use crate::view::TextPresenter;
use crate::view::TextView;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    if cli.verbose {
        TermLogger::init(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?;
        return Ok(());
    }

    let path = cli
        .log_file
        .clone()
        .or_else(paths::log_file)
        .ok_or(CliError::NoLogDir)?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| CliError::io(dir, source))?;
    }
    let file = File::create(&path).map_err(|source| CliError::io(&path, source))?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut transport =
        HttpTransport::builder().user_agent(concat!("tableview/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = cli.timeout {
        transport = transport.request_timeout(Duration::from_secs(secs));
    }
    let transport = Arc::new(transport.build()?);

    let columns: Vec<Column> = std::iter::once(Column::buttons("Id"))
        .chain(
            cli.columns
                .iter()
                .map(|column| Column::field(&column.key, &column.header)),
        )
        .collect();

    let defaults = GridConfig::default();
    let mut sizes = defaults.page_size_options.clone();
    if !sizes.contains(&cli.page_size) {
        sizes.push(cli.page_size);
        sizes.sort_unstable();
    }
    let config = defaults
        .with_default_page_size(cli.page_size)
        .with_page_size_options(sizes);

    let sink = Arc::new(ExitSink::new());
    let grid = Grid::builder()
        .url(cli.url.clone())
        .transport(transport)
        .view(Arc::new(TextView::new(columns)))
        .presenter(Arc::new(TextPresenter::new()))
        .config(config)
        .initial_page(cli.page)
        .error_sink(Arc::clone(&sink))
        .build();
    info!("Using {}", grid.url());

    match cli.command.unwrap_or(Command::List) {
        Command::List => check_reload(grid.reload().await, &sink),
        Command::Add { inputs } => {
            grid.new_record_requested()
                .await
                .ok_or_else(|| reported(&sink))?;
            submit(&grid, FormTarget::Create, &inputs, &sink).await
        }
        Command::Edit { id, inputs } => {
            grid.edit_record_requested(&RecordId::new(id))
                .await
                .ok_or_else(|| reported(&sink))?;
            submit(&grid, FormTarget::Edit, &inputs, &sink).await
        }
        Command::Delete { id } => {
            let reload = grid
                .delete_record_requested(&RecordId::new(id))
                .await
                .ok_or_else(|| reported(&sink))?;
            check_reload(reload, &sink)
        }
    }
}

async fn submit(
    grid: &Grid,
    target: FormTarget,
    inputs: &FormInputs,
    sink: &ExitSink,
) -> Result<(), CliError> {
    let uploads = input::read_files(&inputs.files)?;
    grid.modal(target)
        .with_form(|form| input::fill_form(form, &inputs.fields, uploads))??;

    match grid.submit_form(target).await {
        Some(SubmitOutcome::Accepted) => {
            info!("{:?} form accepted", target);
            // The accepted form triggers a reload; surface its failure.
            match sink.take() {
                Some(message) => Err(CliError::Reported(message)),
                None => Ok(()),
            }
        }
        Some(SubmitOutcome::Replaced) => Err(CliError::Rejected(
            "Server sent a new form; review it and submit again".to_string(),
        )),
        Some(SubmitOutcome::Rejected(errors)) => Err(CliError::Rejected(rejection(&errors))),
        None => Err(reported(sink)),
    }
}

fn check_reload(outcome: ReloadOutcome, sink: &ExitSink) -> Result<(), CliError> {
    match outcome {
        ReloadOutcome::Failed => Err(reported(sink)),
        _ => Ok(()),
    }
}

fn reported(sink: &ExitSink) -> CliError {
    CliError::Reported(
        sink.take()
            .unwrap_or_else(|| "Operation failed".to_string()),
    )
}

fn rejection(errors: &FormErrorPayload) -> String {
    let count = errors.global_errors.len()
        + errors.field_errors.values().map(Vec::len).sum::<usize>();
    format!("Form rejected with {} error(s)", count)
}
