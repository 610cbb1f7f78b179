mod cli;
mod data;
mod pipeline;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cli::{Cli, Format};
use data::loader::load_file;
use data::model::Store;
use pipeline::{StoreAnalysis, StoreReport};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut analyses = Vec::with_capacity(2);
    for (store, path) in [(Store::GooglePlay, &cli.google), (Store::AppStore, &cli.apple)] {
        analyses.push(analyse(store, path)?);
    }

    let reports = analyses
        .iter()
        .map(|analysis| {
            StoreReport::build(analysis, &cli.drill)
                .with_context(|| format!("aggregating {} data", analysis.store()))
        })
        .collect::<Result<Vec<_>>>()?;

    match cli.format {
        Format::Text => {
            for (analysis, report) in analyses.iter().zip(&reports) {
                print!("{}", report::render_text(analysis, report, cli.preview));
            }
        }
        Format::Json => {
            println!("{}", report::render_json(&reports).context("encoding report")?);
        }
    }
    Ok(())
}

fn analyse(store: Store, path: &Path) -> Result<StoreAnalysis> {
    let raw = load_file(path, store)?;
    let analysis = StoreAnalysis::run(raw).with_context(|| format!("cleaning {store} data"))?;
    info!("{store}: {} apps left to analyse", analysis.cleaned.len());
    Ok(analysis)
}
