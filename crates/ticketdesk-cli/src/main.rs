// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::{EffectSink, TerminalHost, load_snapshot, save_snapshot};
use std::env;
use std::io;
use std::path::PathBuf;
use ticketdesk_app::{Dashboard, PageCommand, PageHost};
use ticketdesk_testkit::TicketFaker;

const DEMO_SEED: u64 = 42;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `ticketdesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(config.log_level())?;

    let stdin = io::stdin();
    let mut host = TerminalHost::new(stdin.lock(), io::stderr(), options.assume_yes);
    let page = match (&options.page, options.demo) {
        (Some(_), true) => bail!("--page and --demo are mutually exclusive"),
        (Some(path), false) => load_snapshot(path)?,
        (None, true) => TicketFaker::at(DEMO_SEED, host.now())
            .dashboard_page()
            .context("build demo page")?,
        (None, false) => bail!("no page to load; pass --page <snapshot.json> or --demo"),
    };
    if options.check_only {
        return Ok(());
    }

    let settings = config.settings();
    let known_tables = settings.known_tables.clone();
    let mut sink = EffectSink::new(config.export_dir(), io::stdout().lock());

    let (mut dashboard, effects) = Dashboard::load(page, settings, &host);
    for effect in &effects {
        sink.apply(effect)?;
    }
    for command in options.events {
        tracing::debug!(?command, "replaying event");
        for effect in dashboard.dispatch(command, &mut host) {
            sink.apply(&effect)?;
        }
    }
    sink.summary(dashboard.page(), &known_tables)?;

    if let Some(path) = &options.write {
        save_snapshot(dashboard.page(), path)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    page: Option<PathBuf>,
    demo: bool,
    events: Vec<PageCommand>,
    assume_yes: bool,
    write: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        page: None,
        demo: false,
        events: Vec::new(),
        assume_yes: false,
        write: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str, what: &str| next_value(&mut iter, flag, what);
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(value_for("--config", "a file path")?);
            }
            "--page" => {
                options.page = Some(PathBuf::from(value_for("--page", "a snapshot path")?));
            }
            "--write" => {
                options.write = Some(PathBuf::from(value_for("--write", "a snapshot path")?));
            }
            "--filter" => {
                let raw = value_for("--filter", "<control-id>=<value>")?;
                let (control, value) = raw.split_once('=').ok_or_else(|| {
                    anyhow!("--filter expects <control-id>=<value>, got {raw:?}")
                })?;
                options.events.push(PageCommand::ControlInput {
                    control: control.into(),
                    value: value.to_owned(),
                });
            }
            "--export" => options.events.push(PageCommand::ExportClicked),
            "--paginate" => {
                let link = value_for("--paginate", "a link id")?;
                options.events.push(PageCommand::LinkClicked(link.into()));
            }
            "--describe" => {
                let text = value_for("--describe", "description text")?;
                options.events.push(PageCommand::DescriptionInput(text));
            }
            "--category" => {
                let value = value_for("--category", "a category value")?;
                options.events.push(PageCommand::CategorySelected(value));
            }
            "--submit" => options.events.push(PageCommand::SubmitTicketForm),
            "--click" => {
                let button = value_for("--click", "a button id")?;
                options.events.push(PageCommand::ButtonClicked(button.into()));
            }
            "--my-search" => {
                let text = value_for("--my-search", "search text")?;
                options.events.push(PageCommand::MySearchInput(text));
            }
            "--my-status" => {
                let value = value_for("--my-status", "a status value")?;
                options.events.push(PageCommand::MyStatusChanged(value));
            }
            "--yes" | "-y" => options.assume_yes = true,
            "--demo" => options.demo = true,
            "--print-config-path" => options.print_config_path = true,
            "--print-example-config" => options.print_example = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn next_value<I, S>(iter: &mut I, flag: &str, what: &str) -> Result<String>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    iter.next()
        .map(|value| value.as_ref().to_owned())
        .ok_or_else(|| anyhow!("{flag} requires {what}"))
}

fn print_help() {
    println!("ticketdesk [--config <path>] (--page <snapshot.json> | --demo) [events...]");
    println!("  --config <path>            Use a specific config path");
    println!("  --page <path>              Load a page snapshot (JSON)");
    println!("  --demo                     Load a seeded demo dashboard");
    println!("  --write <path>             Save the resulting snapshot");
    println!("  --yes, -y                  Accept every confirmation prompt");
    println!("  --print-config-path        Print resolved config path");
    println!("  --print-example-config     Print a config template");
    println!("  --check                    Validate config and page, then exit");
    println!("  --help                     Show this help");
    println!();
    println!("Events, replayed in order:");
    println!("  --filter <control-id>=<value>");
    println!("  --export");
    println!("  --paginate <link-id>");
    println!("  --describe <text>");
    println!("  --category <value>");
    println!("  --submit");
    println!("  --click <button-id>");
    println!("  --my-search <text>");
    println!("  --my-status <value>");
}
