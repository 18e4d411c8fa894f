use anyhow::{Context, Error as Failure};
use clap::{Parser, Subcommand};
use futures::{channel::mpsc::unbounded, executor::block_on, sink::unfold as sink};
use junction::config::{Config, SwitchKind};
use junction::session::{Outbound, Session, SessionParser};
use junction::util::thread;
use std::io::{prelude::*, stderr, stdin, stdout};
use std::{future::ready, num::NonZeroUsize, path::PathBuf};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[clap(name = "Junction", version, author)]
#[clap(help_template = "
{name} v{version} by {author}

{name} routes tokens through a single balancer stage of a counting network.
It is released as free software under the terms of the GNU GPLv3 license.

{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Path to a configuration file written in RON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The number of ports, overrides the configuration.
    #[arg(long)]
    width: Option<usize>,

    /// One of `balancer`, `lo`, `hi`, `random` or `random:<seed>`.
    #[arg(long)]
    switch: Option<SwitchKind>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Speak the line protocol over stdin and stdout.
    Serve,

    /// Push random traffic through the layer and print a report.
    Simulate {
        /// The total number of tokens.
        #[arg(long)]
        tokens: Option<u64>,

        /// The number of worker threads.
        #[arg(long)]
        threads: Option<NonZeroUsize>,

        /// The seed for input generation.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging(directives: &str) -> Result<(), Failure> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .context("invalid log filter")?;

    let layer = fmt::layer().with_writer(stderr).with_target(true).compact();
    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(())
}

fn main() -> Result<(), Failure> {
    let args = Cli::parse();
    init_logging(&args.log)?;

    let mut config = match &args.config {
        None => Config::default(),
        Some(path) => Config::load(path).with_context(|| format!("failed to load {}", path.display()))?,
    };

    config.width = args.width.unwrap_or(config.width);
    config.switch = args.switch.unwrap_or(config.switch);
    let layer = config.layer().context("invalid layer")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Simulate {
            tokens,
            threads,
            seed,
        } => {
            let simulation = &mut config.simulation;
            simulation.tokens = tokens.unwrap_or(simulation.tokens);
            simulation.threads = threads.unwrap_or(simulation.threads);
            simulation.seed = seed.unwrap_or(simulation.seed);

            let report = simulation.run(&layer)?;
            writeln!(stdout().lock(), "{}", Outbound::from(report))?;
            Ok(())
        }

        Command::Serve => {
            let (tx, input) = unbounded();

            thread::spawn("stdin", move || {
                let mut lines = stdin().lock().lines();
                while let Some(Ok(line)) = lines.next() {
                    match line.trim() {
                        "" => continue,
                        trimmed => match SessionParser.parse(trimmed) {
                            Err(e) => warn!("ignored command, {e}"),
                            Ok(cmd) => match tx.unbounded_send(cmd) {
                                Ok(()) => continue,
                                Err(_) => break,
                            },
                        },
                    }
                }
            })?;

            let handle = thread::spawn("session", move || {
                let mut stdout = stdout().lock();
                let output = sink((), move |_, o: Outbound| ready(writeln!(stdout, "{o}")));
                let mut session = Session::new(input, Box::pin(output), layer)
                    .with_simulation(config.simulation);

                Ok(block_on(session.run())?)
            })?;

            handle.join()
        }
    }
}
