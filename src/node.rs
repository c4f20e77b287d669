/// A vertex of the portal network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Supernode feeding the two query sources.
    Source,
    /// Ordinary node `1..=n`.
    Ordinary(usize),
    Sink,
    /// Entry side of portal `p`.
    PortalEntry(usize),
    /// Exit side of portal `p`.
    PortalExit(usize),
}

/// Flat numbering of [`Node`]s: source `0`, ordinary `1..=n`, sink `n + 1`,
/// then the `m` entries and the `m` exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpace {
    nodes: usize,
    portals: usize,
}

impl NodeSpace {
    pub fn new(nodes: usize, portals: usize) -> Self {
        NodeSpace { nodes, portals }
    }

    pub fn len(&self) -> usize {
        self.nodes + 2 * self.portals + 2
    }

    fn sink(&self) -> usize {
        self.nodes + 1
    }

    fn entry_base(&self) -> usize {
        self.sink() + 1
    }

    fn exit_base(&self) -> usize {
        self.entry_base() + self.portals
    }

    pub fn id(&self, node: Node) -> usize {
        match node {
            Node::Source => 0,
            Node::Ordinary(v) => v,
            Node::Sink => self.sink(),
            Node::PortalEntry(p) => self.entry_base() + p,
            Node::PortalExit(p) => self.exit_base() + p,
        }
    }

    pub fn node(&self, id: usize) -> Option<Node> {
        match id {
            0 => Some(Node::Source),
            v if v <= self.nodes => Some(Node::Ordinary(v)),
            v if v == self.sink() => Some(Node::Sink),
            v if v < self.exit_base() => Some(Node::PortalEntry(v - self.entry_base())),
            v if v < self.len() => Some(Node::PortalExit(v - self.exit_base())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout_covers_every_id_once() {
        let space = NodeSpace::new(5, 3);
        assert_eq!(space.len(), 13);
        let nodes: Vec<_> = (0..space.len()).map(|id| space.node(id).unwrap()).collect();
        assert_eq!(nodes[0], Node::Source);
        assert_eq!(nodes[5], Node::Ordinary(5));
        assert_eq!(nodes[6], Node::Sink);
        assert_eq!(nodes[7], Node::PortalEntry(0));
        assert_eq!(nodes[10], Node::PortalExit(0));
        assert_eq!(nodes[12], Node::PortalExit(2));
        for (id, node) in nodes.into_iter().enumerate() {
            assert_eq!(space.id(node), id);
        }
        assert_eq!(space.node(13), None);
    }

    #[test]
    fn no_portals() {
        let space = NodeSpace::new(2, 0);
        assert_eq!(space.len(), 4);
        assert_eq!(space.node(3), Some(Node::Sink));
        assert_eq!(space.node(4), None);
    }
}
