//! Binary entry point: parses arguments, loads the network and motif, runs the
//! search, and writes results.

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use ismags::cli::{self, Cli};
use ismags::error::{Error, Result};
use ismags::graph::loader::{self, NetworkFile};
use ismags::motif::parse;
use ismags::output::write_results;
use ismags::search::SearchEngine;

fn run(cli: Cli) -> Result<()> {
    let (registry, link_type_names) = cli::build_link_types(&cli.link_types)?;
    let network_names = cli::split_comma_list(&cli.networks);
    let link_types = cli::ordered_link_types(&registry, &link_type_names);

    let files: Vec<NetworkFile<'_>> = loader::zip_files(&cli.folder, &network_names, &link_types)?;

    info!("reading in networks...");
    let graph = loader::load_network(&files, registry.num_kinds())?;

    info!("creating motif data structure...");
    let translation = cli::build_translation(&registry);
    let motif = parse::parse_motif(&cli.motif, &translation)?;

    let outcome = SearchEngine::find_motif(&graph, &motif, cli.save_links);

    let mut output = File::create(&cli.output).map_err(|source| Error::Io {
        path: cli.output.clone(),
        source,
    })?;
    write_results(&mut output, &graph, &outcome).map_err(|source| Error::Io {
        path: cli.output.clone(),
        source,
    })?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
