use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmpl::cli::Cli;
use tmpl::{render_tree, Context, Renderer};
use tmpl_funcs::{build_hermetic_table, build_table};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr; stdout may carry the rendered output or the archive.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TMPL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let table = if cli.hermetic {
        build_hermetic_table()
    } else {
        build_table()
    };
    let context = Context::from_env();
    debug!(functions = table.len(), vars = context.len(), "starting");
    let renderer = Renderer::new(&table, context, cli.options());

    if let Some(root) = &cli.recursive {
        let sink = cli
            .sink()
            .with_context(|| format!("cannot open output {}", cli.output))?;
        render_tree(root, &renderer, sink, cli.strip_rule())
            .with_context(|| format!("rendering {}", root.display()))?;
        return Ok(());
    }

    let input = cli
        .open_input()
        .with_context(|| format!("cannot open input {}", cli.input))?;
    let output = cli
        .open_output()
        .with_context(|| format!("cannot open output {}", cli.output))?;
    renderer.render_stream(&cli.input, input, output)?;
    Ok(())
}
