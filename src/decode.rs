//! Decoding of the composite edge ids found in diagram exports.
//!
//! An edge id carries a marker (for example `entity-attr`) followed by a
//! payload naming the nodes involved:
//!
//! | marker | payload |
//! |---|---|
//! | `entity-attr-composite` | `entity->attribute->sub[->sub...]` |
//! | `entity-attr` | `entity->attribute` |
//! | `isA: entity:` | `child|discriminator parent` or `child|discriminator->parent` |
//! | `relationship-part:` / `relationship-attr:` | `name$source->target` |
//!
//! The marker is the first or second whitespace-separated token of the id
//! (the second when the id starts with the edge's own name). Marker words
//! compare case-insensitively and may carry a trailing `:`. Names in the
//! payload are never searched for markers.

use std::fmt;

const ARROW: &str = "->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    CompositeAttribute,
    Attribute,
    Generalization,
    Relationship,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::CompositeAttribute => "entity-attr-composite",
            EdgeKind::Attribute => "entity-attr",
            EdgeKind::Generalization => "isA",
            EdgeKind::Relationship => "relationship",
        };
        f.write_str(s)
    }
}

/// The meaning of one edge id, with names still in their exported case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEdge {
    CompositeAttribute {
        entity: String,
        attribute: String,
        sub_attributes: Vec<String>,
    },
    Attribute {
        entity: String,
        attribute: String,
    },
    Generalization {
        child: String,
        discriminator: Option<String>,
        parent: String,
    },
    Relationship {
        name: String,
        source: String,
        target: String,
    },
}

impl DecodedEdge {
    pub fn kind(&self) -> EdgeKind {
        match self {
            DecodedEdge::CompositeAttribute { .. } => EdgeKind::CompositeAttribute,
            DecodedEdge::Attribute { .. } => EdgeKind::Attribute,
            DecodedEdge::Generalization { .. } => EdgeKind::Generalization,
            DecodedEdge::Relationship { .. } => EdgeKind::Relationship,
        }
    }
}

/// A recognized marker whose payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEdge {
    pub kind: EdgeKind,
    pub reason: &'static str,
}

impl fmt::Display for MalformedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {} edge: {}", self.kind, self.reason)
    }
}

impl std::error::Error for MalformedEdge {}

/// Outcome of decoding a single edge id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Edge(DecodedEdge),
    Malformed(MalformedEdge),
    Unrecognized,
}

/// One entry of the dispatch table: the markers that select it and the
/// function that decodes the payload following the marker.
pub struct EdgeDecoder {
    pub kind: EdgeKind,
    /// Alternative spellings, each a sequence of marker words.
    pub markers: &'static [&'static [&'static str]],
    pub decode: fn(&str) -> Result<DecodedEdge, MalformedEdge>,
}

impl EdgeDecoder {
    /// Byte offset just past the marker, if one starts at token `at`.
    fn payload_start(&self, tokens: &[(usize, &str)], at: usize) -> Option<usize> {
        self.markers.iter().find_map(|words| {
            let candidate = tokens.get(at..at + words.len())?;
            let found = candidate
                .iter()
                .zip(words.iter())
                .all(|(&(_, token), word)| same_marker_word(token, word));
            let &(offset, last) = candidate.last()?;
            found.then(|| offset + last.len())
        })
    }
}

/// Token positions a marker may start at.
const MARKER_POSITIONS: [usize; 2] = [0, 1];

/// Decoders in priority order.
pub static DECODERS: &[EdgeDecoder] = &[
    EdgeDecoder {
        kind: EdgeKind::CompositeAttribute,
        markers: &[&["entity-attr-composite"]],
        decode: decode_composite_attribute,
    },
    EdgeDecoder {
        kind: EdgeKind::Attribute,
        markers: &[&["entity-attr"]],
        decode: decode_attribute,
    },
    EdgeDecoder {
        kind: EdgeKind::Generalization,
        markers: &[&["isa:", "entity:"]],
        decode: decode_generalization,
    },
    EdgeDecoder {
        kind: EdgeKind::Relationship,
        markers: &[&["relationship-part:"], &["relationship-attr:"]],
        decode: decode_relationship,
    },
];

/// Decode an edge id with the first decoder whose marker it carries.
pub fn decode_edge_id(id: &str) -> Decoded {
    let tokens = tokenize(id);
    for at in MARKER_POSITIONS {
        for decoder in DECODERS {
            if let Some(start) = decoder.payload_start(&tokens, at) {
                let payload = clean_payload(&id[start..]);
                return match (decoder.decode)(payload) {
                    Ok(edge) => Decoded::Edge(edge),
                    Err(e) => Decoded::Malformed(e),
                };
            }
        }
    }
    Decoded::Unrecognized
}

/// Whitespace-separated tokens with their byte offsets in `s`.
fn tokenize(s: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(begin)) => {
                tokens.push((begin, &s[begin..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(begin) = start {
        tokens.push((begin, &s[begin..]));
    }
    tokens
}

fn same_marker_word(token: &str, word: &str) -> bool {
    token
        .trim_end_matches(':')
        .eq_ignore_ascii_case(word.trim_end_matches(':'))
}

fn clean_payload(raw: &str) -> &str {
    raw.trim_start().trim_start_matches(':').trim()
}

fn malformed(kind: EdgeKind, reason: &'static str) -> MalformedEdge {
    MalformedEdge { kind, reason }
}

/// Split `s` on `->`, trimming every part. Fails on any empty part.
fn split_chain(s: &str, kind: EdgeKind) -> Result<Vec<String>, MalformedEdge> {
    let parts: Vec<String> = s.split(ARROW).map(|p| p.trim().to_string()).collect();
    if parts.iter().any(String::is_empty) {
        return Err(malformed(kind, "empty name in chain"));
    }
    Ok(parts)
}

fn decode_composite_attribute(payload: &str) -> Result<DecodedEdge, MalformedEdge> {
    let kind = EdgeKind::CompositeAttribute;
    let mut parts = split_chain(payload, kind)?.into_iter();
    match (parts.next(), parts.next()) {
        (Some(entity), Some(attribute)) => {
            let sub_attributes: Vec<String> = parts.collect();
            if sub_attributes.is_empty() {
                return Err(malformed(kind, "expected entity->attribute->subattribute"));
            }
            Ok(DecodedEdge::CompositeAttribute {
                entity,
                attribute,
                sub_attributes,
            })
        }
        _ => Err(malformed(kind, "expected entity->attribute->subattribute")),
    }
}

fn decode_attribute(payload: &str) -> Result<DecodedEdge, MalformedEdge> {
    let kind = EdgeKind::Attribute;
    let parts = split_chain(payload, kind)?;
    match <[String; 2]>::try_from(parts) {
        Ok([entity, attribute]) => Ok(DecodedEdge::Attribute { entity, attribute }),
        Err(_) => Err(malformed(kind, "expected entity->attribute")),
    }
}

fn decode_generalization(payload: &str) -> Result<DecodedEdge, MalformedEdge> {
    let kind = EdgeKind::Generalization;

    let (child_part, parent) = match payload.split_once(ARROW) {
        Some((left, right)) => (left.trim(), right.trim()),
        None => {
            let tokens: Vec<&str> = payload.split_whitespace().collect();
            if tokens.len() < 2 {
                return Err(malformed(kind, "expected child|discriminator and parent"));
            }
            let parent = tokens[tokens.len() - 1];
            let child_part = payload[..payload.len() - parent.len()].trim();
            (child_part, parent)
        }
    };

    let (child, discriminator) = match child_part.split_once('|') {
        Some((child, disc)) => {
            let disc = disc.trim();
            (child.trim(), (!disc.is_empty()).then(|| disc.to_string()))
        }
        None => (child_part, None),
    };

    if child.is_empty() || parent.is_empty() {
        return Err(malformed(kind, "empty child or parent"));
    }

    Ok(DecodedEdge::Generalization {
        child: child.to_string(),
        discriminator,
        parent: parent.to_string(),
    })
}

fn decode_relationship(payload: &str) -> Result<DecodedEdge, MalformedEdge> {
    let kind = EdgeKind::Relationship;
    let (name, participants) = payload
        .split_once('$')
        .ok_or_else(|| malformed(kind, "missing '$' separator"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed(kind, "empty relationship name"));
    }
    let parts = split_chain(participants, kind)?;
    match <[String; 2]>::try_from(parts) {
        Ok([source, target]) => Ok(DecodedEdge::Relationship {
            name: name.to_string(),
            source,
            target,
        }),
        Err(_) => Err(malformed(kind, "expected source->target")),
    }
}
