//! Writes motif search results: one line per instance, plus an optional used-links
//! section.

use std::io::{self, Write};

use crate::graph::HostGraph;
use crate::search::{MotifInstance, SearchOutcome};

/// Writes `outcome` to `writer`: one line per instance (host-node descriptions joined
/// by `;`, in motif-node-index order, in discovery order), then, if links were saved,
/// a blank line followed by one `link <a>;<b>` line per canonical pair, sorted.
///
/// Returns a plain `io::Result`: the caller (the binary) knows the output path and
/// wraps any error into `Error::Io` with that context.
pub fn write_results<W: Write>(writer: &mut W, graph: &HostGraph, outcome: &SearchOutcome) -> io::Result<()> {
    for instance in &outcome.instances {
        writeln!(writer, "{}", format_instance(graph, instance))?;
    }

    if let Some(links) = &outcome.used_links {
        writeln!(writer)?;
        for &(a, b) in links {
            writeln!(
                writer,
                "link {};{}",
                graph.node(a).description(),
                graph.node(b).description()
            )?;
        }
    }

    Ok(())
}

fn format_instance(graph: &HostGraph, instance: &MotifInstance) -> String {
    instance
        .iter()
        .map(|&id| graph.node(id).description())
        .collect::<Vec<_>>()
        .join(";")
}
