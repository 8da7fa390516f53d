//! Parses and re-serializes the lower-triangular motif description string, e.g.
//! `"AA0A00"` for a 4-node motif.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::graph::LinkType;

use super::{Motif, MotifBuilder, MotifNodeId};

/// Maps the single character used for a link type in a motif string to the
/// `LinkType` it names. Built by the CLI from the `-l` spec.
pub type Translation<'a> = HashMap<char, &'a LinkType>;

/// Number of motif nodes implied by a description of length `len`, i.e. the smallest
/// `n` with `n*(n-1)/2 >= len` -- and the caller must then check for equality.
fn node_count_for_len(len: usize) -> usize {
    ((2 * len) as f64).sqrt().ceil() as usize
}

/// Parses `description` into a finalized [`Motif`].
///
/// `description[k]` for `k` in row-major order over `1 <= i < n, 0 <= j < i` gives the
/// link between motif nodes `i` and `j`: `'0'` means no link; otherwise the character is
/// looked up in `translation`, and its case selects direction -- uppercase means `j -> i`,
/// lowercase means `i -> j`.
pub fn parse_motif(description: &str, translation: &Translation<'_>) -> Result<Motif> {
    let len = description.chars().count();
    let n = node_count_for_len(len);
    if len != n * (n.saturating_sub(1)) / 2 {
        return Err(Error::config(format!(
            "motif description `{description}` has invalid length {len}"
        )));
    }

    let mut builder = MotifBuilder::new(n);
    let chars: Vec<char> = description.chars().collect();
    let mut counter = 0;
    for i in 1..n {
        for j in 0..i {
            let c = chars[counter];
            counter += 1;
            if c == '0' {
                continue;
            }
            let upper = c.to_ascii_uppercase();
            let link_type = translation.get(&upper).copied().ok_or_else(|| {
                Error::config(format!("motif description uses unknown link type `{c}`"))
            })?;
            let (start, end) = if c.is_uppercase() {
                (j, i)
            } else {
                (i, j)
            };
            builder.add_link(
                MotifNodeId::new(start),
                MotifNodeId::new(end),
                link_type.forward(),
                link_type.inverse(),
            );
        }
    }
    Ok(builder.finalize(description.to_string()))
}

/// One entry of the alphabet needed to serialize a motif back to its description
/// string: for each `LinkKindId` that can appear as a motif incidence kind, the
/// character used for its link type and whether that kind is the type's forward
/// (uppercase-producing) direction.
pub struct Alphabet {
    by_kind: HashMap<crate::graph::LinkKindId, (char, bool)>,
}

impl Alphabet {
    pub fn build(translation: &Translation<'_>) -> Self {
        let mut by_kind = HashMap::new();
        for (&ch, link_type) in translation {
            let upper = ch.to_ascii_uppercase();
            if link_type.forward() == link_type.inverse() {
                // Undirected: case carries no information, canonicalize to uppercase.
                by_kind.insert(link_type.forward(), (upper, true));
            } else {
                by_kind.insert(link_type.forward(), (upper, true));
                by_kind.insert(link_type.inverse(), (upper, false));
            }
        }
        Self { by_kind }
    }
}

/// Reconstructs the description string for `motif`, given the alphabet used to parse
/// it. Round-trips with [`parse_motif`] for any motif actually produced by it.
pub fn serialize_motif(motif: &Motif, alphabet: &Alphabet) -> String {
    let n = motif.n();
    let mut out = String::with_capacity(n * (n.saturating_sub(1)) / 2);
    for i in 1..n {
        for j in 0..i {
            let node_i = MotifNodeId::new(i);
            let node_j = MotifNodeId::new(j);
            let incidence = motif
                .conn(node_j)
                .iter()
                .zip(motif.link_kind(node_j).iter())
                .find(|(&to, _)| to == node_i)
                .map(|(_, &kind)| kind);

            let ch = match incidence.and_then(|kind| alphabet.by_kind.get(&kind)) {
                Some(&(c, true)) => c,
                Some(&(c, false)) => c.to_ascii_lowercase(),
                None => '0',
            };
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkTypeRegistry;

    #[test]
    fn rejects_invalid_length() {
        let translation: Translation<'_> = HashMap::new();
        assert!(parse_motif("AA0", &translation).is_err());
    }

    #[test]
    fn parses_directed_triangle() {
        let mut reg = LinkTypeRegistry::new();
        let a = reg.register("A", true, "T", "T").clone();
        let mut translation: Translation<'_> = HashMap::new();
        translation.insert('A', &a);

        // n=3, len=3: chars for (1,0) (2,0) (2,1)
        let motif = parse_motif("AAA", &translation).unwrap();
        assert_eq!(motif.n(), 3);
        assert_eq!(motif.conn(MotifNodeId::new(0)).len(), 2);
    }

    #[test]
    fn round_trips_through_alphabet() {
        let mut reg = LinkTypeRegistry::new();
        let a = reg.register("A", true, "T", "T").clone();
        let b = reg.register("B", false, "T", "T").clone();
        let mut translation: Translation<'_> = HashMap::new();
        translation.insert('A', &a);
        translation.insert('B', &b);

        let description = "aB0";
        let motif = parse_motif(description, &translation).unwrap();
        let alphabet = Alphabet::build(&translation);
        assert_eq!(serialize_motif(&motif, &alphabet), description);
    }
}
