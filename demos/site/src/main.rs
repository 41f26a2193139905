//! Tutorial site: builds the handler catalog, publishes the dispatch table
//! to the reference router, and drives it from the command line.

mod api;
mod pages;
mod registry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;
use routemap::{publish_table, report, RequestContext, Router};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "site")]
#[command(about = "Tutorial site driven by the routemap dispatch table", long_about = None)]
struct Cli {
    /// Write the route report to this file after the table is published.
    #[arg(long)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route report for the published table
    List,
    /// Simulate one request through the reference router
    Request {
        method: String,
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Startup is fail-fast: a configuration, instantiation, or duplicate
    // route error aborts here, before any route is visible to the router.
    let catalog = registry::build_catalog()?;
    let mut router = Router::new();
    let table = publish_table(&catalog, &mut router)?;
    router.provide(table.clone());

    if let Some(path) = &cli.export {
        // Export failure is diagnostic only; the published table stays up.
        if let Err(err) = report::write_report(&table, path) {
            warn!(error = %err, "route report export failed");
        }
    }

    match cli.command {
        None | Some(Commands::List) => {
            print!("{}", report::render_report(&table));
        }
        Some(Commands::Request { method, path, body }) => {
            let method: Method = method
                .to_uppercase()
                .parse()
                .context("invalid HTTP method")?;
            let mut cx = RequestContext::new(method, path);
            if let Some(raw) = body {
                cx.body =
                    Some(serde_json::from_str(&raw).context("request body is not valid JSON")?);
            }

            if router.dispatch(&mut cx) {
                println!(
                    "{} {}",
                    cx.response.status,
                    cx.response.get_header("content-type").unwrap_or("-")
                );
                match &cx.response.body {
                    serde_json::Value::String(text) => println!("{text}"),
                    other => println!("{other}"),
                }
            } else {
                println!("404 no route matched {}", cx.path);
            }
        }
    }

    Ok(())
}
