//! Command-line surface: argument parsing and link-type-spec interpretation.
//!
//! `-l`/`-n` are a matched pair of comma-separated lists: position `i` of `-n` is the
//! network file that carries edges of the link-type tetrad at position `i` of `-l`.
//! The same link-type name may repeat across tetrads (pointing at different network
//! files for the same type), so `-n` is zipped against tetrad occurrences, not
//! against the set of distinct names.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use log::error;

use crate::error::{Error, Result};
use crate::graph::{LinkType, LinkTypeRegistry};

/// Index-based Subgraph Matching Algorithm with General Symmetries.
#[derive(Debug, Parser)]
#[command(name = "ismags", about = "Index-based Subgraph Matching Algorithm with General Symmetries")]
pub struct Cli {
    /// Link types separated by commas, e.g. "A u P P" or "A u P P,A d P P".
    #[arg(short = 'l', long = "link-types")]
    pub link_types: String,

    /// Network files separated by commas, e.g. file1.txt or file1.txt,file2.txt.
    #[arg(short = 'n', long = "networks")]
    pub networks: String,

    /// Motif description, e.g. AA0A00.
    #[arg(short = 'm', long = "motif")]
    pub motif: String,

    /// Output file path.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Folder containing the network files.
    #[arg(short = 'f', long = "folder", default_value = ".")]
    pub folder: PathBuf,

    /// Keep the set of host edges used by the found instances.
    #[arg(short = 's', long = "save-links")]
    pub save_links: bool,
}

struct LinkTypeSpec {
    name: String,
    directed: bool,
    src_network: String,
    dst_network: String,
}

fn parse_link_type_item(item: &str) -> Option<LinkTypeSpec> {
    let parts: Vec<&str> = item.split(' ').filter(|p| !p.is_empty()).collect();
    if parts.len() != 4 {
        return None;
    }
    Some(LinkTypeSpec {
        name: parts[0].to_string(),
        directed: parts[1] == "d",
        src_network: parts[2].to_string(),
        dst_network: parts[3].to_string(),
    })
}

/// Parses the `-l` spec. Returns the populated registry and the name of each tetrad
/// in order (parallel to `-n`'s file list). A malformed tetrad is logged and skipped;
/// it is fatal only if nothing valid remains.
pub fn build_link_types(spec: &str) -> Result<(LinkTypeRegistry, Vec<String>)> {
    let mut registry = LinkTypeRegistry::new();
    let mut ordered = Vec::new();

    for item in spec.split(',').map(str::trim) {
        match parse_link_type_item(item) {
            Some(parsed) => {
                registry.register(&parsed.name, parsed.directed, &parsed.src_network, &parsed.dst_network);
                ordered.push(parsed.name);
            }
            None => error!("link type `{item}` doesn't meet specification, ignoring given link type."),
        }
    }

    if ordered.is_empty() {
        return Err(Error::config("no valid link types to process"));
    }
    Ok((registry, ordered))
}

/// Resolves each tetrad name (in `-l` order) to the `LinkType` the registry assigned
/// it, for zipping positionally against `-n`'s file list.
pub fn ordered_link_types<'a>(registry: &'a LinkTypeRegistry, names: &[String]) -> Vec<&'a LinkType> {
    names.iter().map(|name| registry.get(name).expect("name was registered by build_link_types")).collect()
}

/// Builds the single-character `motif::parse` translation table: one entry per
/// distinct link type, keyed by the first character of its name, uppercased (motif
/// description strings use the uppercase letter as the type's canonical character).
pub fn build_translation(registry: &LinkTypeRegistry) -> HashMap<char, &LinkType> {
    registry
        .iter()
        .filter_map(|t| t.name.chars().next().map(|c| (c.to_ascii_uppercase(), t)))
        .collect()
}

/// Splits a comma-separated list, trimming whitespace from each item.
pub fn split_comma_list(s: &str) -> Vec<String> {
    s.split(',').map(|item| item.trim().to_string()).collect()
}
