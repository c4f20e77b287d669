use std::{fs::File, io::Read, path::Path, str::FromStr};

use clap::ValueEnum;
use serde::Deserialize;

use crate::{
    dinic::DinicGraph,
    error::InputError,
    node::{Node, NodeSpace},
    portal::{Portal, ZeroModulus},
};

/// Input encodings of an [`Instance`].
#[derive(Debug, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Whitespace separated integers.
    #[default]
    Tokens,
    /// A JSON document with `nodes`, `portals`, `destination` and `queries`.
    Json,
}

/// Ordinary nodes, the portals between them and the node wired to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalGraph {
    pub nodes: usize,
    pub portals: Box<[Portal]>,
    pub destination: usize,
}

/// A graph together with the query pairs to answer against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub graph: PortalGraph,
    pub queries: Box<[(usize, usize)]>,
}

#[derive(Deserialize, Debug)]
struct RawInstance {
    nodes: usize,
    portals: Vec<Portal>,
    destination: i64,
    queries: Vec<(i64, i64)>,
}

fn in_range(node: i64, nodes: usize) -> Option<usize> {
    usize::try_from(node).ok().filter(|v| (1..=nodes).contains(v))
}

impl RawInstance {
    fn validate(self) -> Result<Instance, InputError> {
        let nodes = self.nodes;
        for (portal, p) in self.portals.iter().enumerate() {
            if let Some(modulus) = p.negative_modulus() {
                return Err(InputError::NegativeModulus { portal, modulus });
            }
        }
        let destination =
            in_range(self.destination, nodes).ok_or(InputError::DestinationOutOfRange {
                destination: self.destination,
                nodes,
            })?;
        let queries: Box<[(usize, usize)]> = self
            .queries
            .into_iter()
            .map(|(x, y)| {
                let check =
                    |node| in_range(node, nodes).ok_or(InputError::NodeOutOfRange { node, nodes });
                Ok((check(x)?, check(y)?))
            })
            .collect::<Result<_, InputError>>()?;
        Ok(Instance {
            graph: PortalGraph {
                nodes,
                portals: self.portals.into_boxed_slice(),
                destination,
            },
            queries,
        })
    }
}

struct Tokens<'a>(std::str::SplitAsciiWhitespace<'a>);

impl Tokens<'_> {
    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<T, InputError> {
        let token = self.0.next().ok_or(InputError::UnexpectedEof(what))?;
        token.parse().map_err(|_| InputError::InvalidToken {
            what,
            token: token.to_owned(),
        })
    }
}

impl Instance {
    /// Parses `n m`, `m` portal lines, `d q` and `q` query lines.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut tokens = Tokens(text.split_ascii_whitespace());
        let nodes: usize = tokens.next("node count")?;
        let m: usize = tokens.next("portal count")?;
        let portals: Vec<Portal> = (0..m)
            .map(|_| {
                Ok(Portal {
                    a1: tokens.next("portal entry modulus")?,
                    l1: tokens.next("portal entry lower bound")?,
                    r1: tokens.next("portal entry upper bound")?,
                    a2: tokens.next("portal exit modulus")?,
                    l2: tokens.next("portal exit lower bound")?,
                    r2: tokens.next("portal exit upper bound")?,
                })
            })
            .collect::<Result<_, InputError>>()?;
        let destination: i64 = tokens.next("destination")?;
        let q: usize = tokens.next("query count")?;
        let queries: Vec<(i64, i64)> = (0..q)
            .map(|_| Ok((tokens.next("query node")?, tokens.next("query node")?)))
            .collect::<Result<_, InputError>>()?;
        RawInstance {
            nodes,
            portals,
            destination,
            queries,
        }
        .validate()
    }

    pub fn read<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text).map_err(Into::into)
    }

    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let raw: RawInstance = simd_json::from_reader(reader)?;
        raw.validate().map_err(Into::into)
    }

    pub fn from_reader<R: Read>(reader: R, format: Format) -> anyhow::Result<Self> {
        match format {
            Format::Tokens => Self::read(reader),
            Format::Json => Self::from_json(reader),
        }
    }

    pub fn load<S: AsRef<Path>>(x: S, format: Format) -> anyhow::Result<Self> {
        let file = File::open(x)?;
        Self::from_reader(file, format)
    }
}

/// Capacity used for edges that are only bounded by the flow target.
pub const OPEN: isize = 2;

/// Dinic network over [`NodeSpace`] ids plus the source edge of every
/// ordinary node (indexed by node, slot `0` unused).
pub struct Materialized {
    pub dinic: DinicGraph,
    pub source_edges: Box<[usize]>,
}

impl PortalGraph {
    pub fn space(&self) -> NodeSpace {
        NodeSpace::new(self.nodes, self.portals.len())
    }

    /// Builds the explicit network. Source edges start closed and are opened
    /// per query.
    pub fn as_dinic_graph(&self, zero: ZeroModulus) -> Materialized {
        let space = self.space();
        let mut dinic = DinicGraph::new(
            space.len(),
            space.id(Node::Source),
            space.id(Node::Sink),
        );
        let mut source_edges = vec![0; self.nodes + 1];
        for v in 1..=self.nodes {
            source_edges[v] = dinic.add_edge(space.id(Node::Source), v, 0);
        }
        for (p, portal) in self.portals.iter().enumerate() {
            let entry = space.id(Node::PortalEntry(p));
            let exit = space.id(Node::PortalExit(p));
            for v in portal.entries(self.nodes) {
                dinic.add_edge(space.id(Node::Ordinary(v)), entry, OPEN);
            }
            dinic.add_edge(entry, exit, 1);
            for c in portal.exits(self.nodes, zero) {
                dinic.add_edge(exit, space.id(Node::Ordinary(c)), OPEN);
            }
        }
        dinic.add_edge(
            space.id(Node::Ordinary(self.destination)),
            space.id(Node::Sink),
            OPEN,
        );
        Materialized {
            dinic,
            source_edges: source_edges.into_boxed_slice(),
        }
    }
}
