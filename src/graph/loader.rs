//! Reads tab-separated edge-list files into a [`HostGraph`](super::HostGraph).

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};

use super::{HostGraph, HostGraphBuilder, LinkType, NodeIdAllocator};

/// One network file paired with the link type its edges belong to.
pub struct NetworkFile<'a> {
    pub path: PathBuf,
    pub link_type: &'a LinkType,
}

/// Reads every file in `files` and returns the resulting graph.
///
/// Lines containing `#` are treated as comments and skipped. A line without a tab is
/// malformed: it is logged at `warn!` and skipped, never fatal. A self-loop (source and
/// destination resolve to the same description after network-tag suffixing) is skipped
/// silently, matching the original loader. An unreadable file is fatal.
pub fn load_network(files: &[NetworkFile<'_>], num_kinds: usize) -> Result<HostGraph> {
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(num_kinds);

    for file in files {
        let text = std::fs::read_to_string(&file.path).map_err(|source| Error::Io {
            path: file.path.clone(),
            source,
        })?;
        let mut links = 0usize;
        for (lineno, line) in text.lines().enumerate() {
            if line.contains('#') {
                continue;
            }
            let Some(tab) = line.find('\t') else {
                if !line.trim().is_empty() {
                    warn!("{}:{}: missing tab separator, skipping line", file.path.display(), lineno + 1);
                }
                continue;
            };
            if tab == 0 {
                continue;
            }
            let raw_src = &line[..tab];
            let raw_dst = &line[tab + 1..];
            let desc_src = format!("{raw_src}{}", file.link_type.src_network);
            let desc_dst = format!("{raw_dst}{}", file.link_type.dst_network);
            if desc_src == desc_dst {
                continue;
            }
            let src = builder.node_for_description(&mut alloc, &desc_src);
            let dst = builder.node_for_description(&mut alloc, &desc_dst);
            builder.add_edge(src, dst, file.link_type.forward());
            builder.add_edge(dst, src, file.link_type.inverse());
            links += 1;
        }
        info!("read {}: {} links", file.path.display(), links);
    }

    let graph = builder.finalize();
    info!("nodes: {}", graph.node_count());
    Ok(graph)
}

/// Convenience: build the `(path, link_type)` pairs from parallel CLI-derived lists.
pub fn zip_files<'a>(folder: &Path, names: &[String], link_types: &[&'a LinkType]) -> Result<Vec<NetworkFile<'a>>> {
    if names.len() != link_types.len() {
        return Err(Error::config(format!(
            "{} network file(s) but {} link type(s); counts must match",
            names.len(),
            link_types.len()
        )));
    }
    Ok(names
        .iter()
        .zip(link_types.iter())
        .map(|(name, &link_type)| NetworkFile {
            path: folder.join(name),
            link_type,
        })
        .collect())
}
