use tracing::{Level, debug, trace};

use crate::{
    checker::{Feasibility, REQUIRED_PATHS, Verdict},
    dinic::DinicGraph,
    error::InputError,
    graph::{Materialized, PortalGraph},
    node::{Node, NodeSpace},
    portal::ZeroModulus,
};

/// Exact answers from a max flow over the explicit portal network.
pub struct FlowNetwork {
    nodes: usize,
    space: NodeSpace,
    dinic: DinicGraph,
    source_edges: Box<[usize]>,
    /// source edges opened by the previous query
    opened: [usize; 2],
}

impl FlowNetwork {
    pub fn new(graph: &PortalGraph, zero: ZeroModulus) -> Self {
        let Materialized {
            dinic,
            source_edges,
        } = graph.as_dinic_graph(zero);
        debug!(edges = dinic.edge_count(), "network materialized");
        FlowNetwork {
            nodes: graph.nodes,
            space: graph.space(),
            dinic,
            source_edges,
            opened: [0; 2],
        }
    }

    pub fn answer(&mut self, x: usize, y: usize) -> Result<Verdict, InputError> {
        for node in [x, y] {
            if !(1..=self.nodes).contains(&node) {
                return Err(InputError::NodeOutOfRange {
                    node: node as i64,
                    nodes: self.nodes,
                });
            }
        }
        for v in self.opened {
            if v != 0 {
                self.dinic.set_capacity(self.source_edges[v], 0);
            }
        }
        self.dinic.clear_flow();
        if x == y {
            self.dinic.set_capacity(self.source_edges[x], 2);
        } else {
            self.dinic.set_capacity(self.source_edges[x], 1);
            self.dinic.set_capacity(self.source_edges[y], 1);
        }
        self.opened = [x, y];
        let flow = self.dinic.calculate_flow(REQUIRED_PATHS as isize);
        debug!(x, y, flow, "query finished");
        if tracing::enabled!(Level::TRACE) {
            trace!(x, y, used = ?self.used_portals(), "portals carrying flow");
        }
        Ok(Verdict::from(flow == REQUIRED_PATHS as isize))
    }

    /// Portals whose entry-exit edge carries flow after the last query.
    pub fn used_portals(&self) -> Vec<usize> {
        self.dinic
            .current_flow()
            .filter_map(|(u, _, _)| match self.space.node(u) {
                Some(Node::PortalEntry(p)) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl Feasibility for FlowNetwork {
    fn answer(&mut self, x: usize, y: usize) -> Result<Verdict, InputError> {
        FlowNetwork::answer(self, x, y)
    }
}
