//! Greedy two-path feasibility search.
//!
//! Each query routes up to two units from the query sources to the
//! destination with depth-first augmenting paths. Portals carry one unit per
//! query; ordinary nodes are only constrained by the per-attempt visited set.
//! No reverse residual edges are used, so a `No` here can still be a `Yes`
//! for [`crate::network::FlowNetwork`].

use std::fmt;

use tracing::{debug, trace};

use crate::{
    error::InputError,
    graph::PortalGraph,
    node::{Node, NodeSpace},
    portal::ZeroModulus,
};

/// Units that have to reach the sink for a `Yes`.
pub const REQUIRED_PATHS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Yes,
    No,
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Verdict::Yes } else { Verdict::No }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Yes => f.write_str("Yes"),
            Verdict::No => f.write_str("No"),
        }
    }
}

/// Something that can decide a query pair.
pub trait Feasibility {
    fn answer(&mut self, x: usize, y: usize) -> Result<Verdict, InputError>;
}

/// Supernode edge towards one query source.
#[derive(Debug, Clone, Copy)]
struct SourceEdge {
    to: usize,
    cap: u8,
}

pub struct FeasibilityChecker<'a> {
    graph: &'a PortalGraph,
    space: NodeSpace,
    zero: ZeroModulus,
    /// remaining uses of each portal in the current query
    residual: Vec<u8>,
    /// visited markers of the current attempt, indexed by node id
    visited: Vec<bool>,
    sources: [SourceEdge; 2],
}

impl<'a> FeasibilityChecker<'a> {
    pub fn new(graph: &'a PortalGraph, zero: ZeroModulus) -> Self {
        let space = graph.space();
        FeasibilityChecker {
            graph,
            space,
            zero,
            residual: vec![1; graph.portals.len()],
            visited: vec![false; space.len()],
            sources: [SourceEdge { to: 0, cap: 0 }; 2],
        }
    }

    fn check(&self, node: usize) -> Result<usize, InputError> {
        if (1..=self.graph.nodes).contains(&node) {
            Ok(node)
        } else {
            Err(InputError::NodeOutOfRange {
                node: node as i64,
                nodes: self.graph.nodes,
            })
        }
    }

    /// Can two units leave `x` and `y` and both reach the destination?
    pub fn answer(&mut self, x: usize, y: usize) -> Result<Verdict, InputError> {
        let (x, y) = (self.check(x)?, self.check(y)?);
        self.residual.fill(1);
        self.sources = if x == y {
            [SourceEdge { to: x, cap: 2 }, SourceEdge { to: y, cap: 0 }]
        } else {
            [SourceEdge { to: x, cap: 1 }, SourceEdge { to: y, cap: 1 }]
        };
        let mut found = 0;
        while found < REQUIRED_PATHS {
            self.visited.fill(false);
            if !self.augment(Node::Source) {
                break;
            }
            found += 1;
            trace!(x, y, found, "augmenting path");
        }
        debug!(x, y, found, "query finished");
        Ok(Verdict::from(found == REQUIRED_PATHS))
    }

    fn enter(&mut self, node: Node) -> bool {
        !self.visited[self.space.id(node)] && self.augment(node)
    }

    fn augment(&mut self, node: Node) -> bool {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
            self.visited[self.space.id(node)] = true;
            let graph = self.graph;
            match node {
                Node::Sink => true,
                Node::Source => {
                    for slot in 0..self.sources.len() {
                        let edge = self.sources[slot];
                        if edge.cap > 0 && self.enter(Node::Ordinary(edge.to)) {
                            self.sources[slot].cap -= 1;
                            return true;
                        }
                    }
                    false
                }
                Node::Ordinary(v) => {
                    for (p, portal) in graph.portals.iter().enumerate() {
                        if portal.admits(v) && self.enter(Node::PortalEntry(p)) {
                            return true;
                        }
                    }
                    v == graph.destination && self.enter(Node::Sink)
                }
                Node::PortalEntry(p) => {
                    if self.residual[p] > 0 && self.enter(Node::PortalExit(p)) {
                        self.residual[p] -= 1;
                        return true;
                    }
                    false
                }
                Node::PortalExit(p) => graph.portals[p]
                    .exits(graph.nodes, self.zero)
                    .any(|c| self.enter(Node::Ordinary(c))),
            }
        })
    }
}

impl Feasibility for FeasibilityChecker<'_> {
    fn answer(&mut self, x: usize, y: usize) -> Result<Verdict, InputError> {
        FeasibilityChecker::answer(self, x, y)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Instance;

    fn answers(input: &str, zero: ZeroModulus) -> Vec<Verdict> {
        let instance = Instance::parse(input).unwrap();
        let mut checker = FeasibilityChecker::new(&instance.graph, zero);
        instance
            .queries
            .iter()
            .map(|&(x, y)| checker.answer(x, y).unwrap())
            .collect()
    }

    #[test]
    fn single_portal_scenario() {
        let input = "5 1\n0 1 5 0 1 5\n5 3\n1 2\n5 5\n2 5\n";
        assert_eq!(
            answers(input, ZeroModulus::Unreachable),
            vec![Verdict::No, Verdict::Yes, Verdict::No]
        );
        // with an open exit, 2 reaches 5 through the portal
        assert_eq!(
            answers(input, ZeroModulus::Unconstrained),
            vec![Verdict::No, Verdict::Yes, Verdict::Yes]
        );
    }

    #[test]
    fn one_portal_plus_direct_edge() {
        // 2 can hop to 5 through the portal while 5 leaves directly
        let input = "5 1\n0 1 5 1 5 5\n5 2\n2 5\n1 2\n";
        assert_eq!(
            answers(input, ZeroModulus::Unreachable),
            vec![Verdict::Yes, Verdict::No]
        );
    }

    #[test]
    fn destination_twice_needs_no_portal() {
        let input = "4 0\n3 1\n3 3\n";
        assert_eq!(answers(input, ZeroModulus::Unreachable), vec![Verdict::Yes]);
    }

    #[test]
    fn same_source_needs_two_portals() {
        // two parallel portals from 1 to 4 versus a single one from 2
        let input = "4 3\n1 1 1 1 4 4\n1 1 1 2 4 4\n1 2 2 4 4 4\n4 3\n1 1\n2 2\n1 2\n";
        assert_eq!(
            answers(input, ZeroModulus::Unreachable),
            vec![Verdict::Yes, Verdict::No, Verdict::Yes]
        );
    }

    #[test]
    fn chained_portals() {
        // 1 -> 2 -> 3 -> 6, and 4 -> 5..=6 only if the zero modulus is open
        let input = "6 4\n\
                     1 1 1 2 2 2\n\
                     1 2 2 3 3 3\n\
                     1 3 3 6 6 6\n\
                     1 4 4 0 5 6\n\
                     6 1\n1 4\n";
        assert_eq!(answers(input, ZeroModulus::Unreachable), vec![Verdict::No]);
        assert_eq!(answers(input, ZeroModulus::Unconstrained), vec![Verdict::Yes]);
    }

    #[test]
    fn exit_without_multiple_contributes_nothing() {
        let input = "10 1\n0 1 10 7 8 13\n10 1\n10 1\n";
        assert_eq!(answers(input, ZeroModulus::Unreachable), vec![Verdict::No]);
    }

    #[test]
    fn queries_are_independent() {
        let input = "5 1\n0 1 5 1 5 5\n5 0\n";
        let instance = Instance::parse(input).unwrap();
        let mut checker = FeasibilityChecker::new(&instance.graph, ZeroModulus::Unreachable);
        let first = checker.answer(2, 5).unwrap();
        for _ in 0..3 {
            assert_eq!(checker.answer(1, 2).unwrap(), Verdict::No);
            assert_eq!(checker.answer(2, 5).unwrap(), first);
        }
        assert_eq!(first, Verdict::Yes);
        assert!(checker.residual.iter().all(|r| *r <= 1));
    }

    #[test]
    fn portal_used_at_most_once() {
        let input = "3 1\n0 1 2 1 3 3\n3 0\n";
        let instance = Instance::parse(input).unwrap();
        let mut checker = FeasibilityChecker::new(&instance.graph, ZeroModulus::Unreachable);
        assert_eq!(checker.answer(1, 2).unwrap(), Verdict::No);
        assert_eq!(checker.residual, vec![0]);
    }

    #[test]
    fn out_of_range_query() {
        let input = "3 0\n3 0\n";
        let instance = Instance::parse(input).unwrap();
        let mut checker = FeasibilityChecker::new(&instance.graph, ZeroModulus::Unreachable);
        assert_eq!(
            checker.answer(0, 1),
            Err(InputError::NodeOutOfRange { node: 0, nodes: 3 })
        );
        assert_eq!(
            checker.answer(1, 4),
            Err(InputError::NodeOutOfRange { node: 4, nodes: 3 })
        );
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 5_000;
        let mut input = format!("{n} {}\n", n - 1);
        for v in 1..n {
            input.push_str(&format!("1 {v} {v} 1 {} {}\n", v + 1, v + 1));
        }
        input.push_str(&format!("{n} 1\n1 {n}\n"));
        assert_eq!(answers(&input, ZeroModulus::Unreachable), vec![Verdict::Yes]);
    }
}
