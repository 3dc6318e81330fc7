//! Network topology.
//!
//! The cost model only needs two things from the transport network: the
//! position of every link (to place emissions on the exposure grid) and the
//! bounding box of all nodes (to lay out that grid).  `Network` keeps exactly
//! that, plus an R-tree over link positions for snapping free coordinates to
//! the closest link.
//!
//! A link's position is the midpoint of its end nodes unless one is given
//! explicitly with [`NetworkBuilder::add_link_at`].

use std::collections::HashMap;
use std::hash::BuildHasher;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use ec_core::{BoundingBox, Coord, LinkId, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Topology ──────────────────────────────────────────────────────────────────

/// Resolves a link identifier to a planar coordinate.
///
/// Implemented by [`Network`]; cost calculators and the exposure aggregator
/// only depend on this trait so tests can plug in a map.
pub trait Topology {
    /// Position of `link`.  An unknown link is a fatal data error.
    fn link_coord(&self, link: LinkId) -> SpatialResult<Coord>;
}

impl<S: BuildHasher> Topology for HashMap<LinkId, Coord, S> {
    fn link_coord(&self, link: LinkId) -> SpatialResult<Coord> {
        self.get(&link).copied().ok_or(SpatialError::LinkNotFound(link))
    }
}

// ── R-tree link entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct LinkEntry {
    point: [f64; 2],
    id:    LinkId,
}

impl RTreeObject for LinkEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LinkEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// A directed link between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub id:    LinkId,
    pub from:  NodeId,
    pub to:    NodeId,
    /// Representative position of the link.
    pub coord: Coord,
}

/// Immutable network topology.  Build with [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    node_pos:   FxHashMap<NodeId, Coord>,
    links:      Vec<Link>,
    link_index: FxHashMap<LinkId, usize>,
    bbox:       Option<BoundingBox>,
    link_tree:  RTree<LinkEntry>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Bounding box of all node positions.  `None` for an empty network.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn node_coord(&self, node: NodeId) -> Option<Coord> {
        self.node_pos.get(&node).copied()
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.link_index.get(&id).map(|&i| &self.links[i])
    }

    /// All links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    /// Link whose position is closest to `pos`.  `None` if there are no links.
    pub fn nearest_link(&self, pos: Coord) -> Option<LinkId> {
        self.link_tree.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }
}

impl Topology for Network {
    fn link_coord(&self, link: LinkId) -> SpatialResult<Coord> {
        self.link(link)
            .map(|l| l.coord)
            .ok_or(SpatialError::LinkNotFound(link))
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ec_core::{Coord, LinkId, NodeId};
/// use ec_spatial::{NetworkBuilder, Topology};
///
/// let mut b = NetworkBuilder::new();
/// b.add_node(NodeId(1), Coord::new(0.0, 0.0)).unwrap();
/// b.add_node(NodeId(2), Coord::new(100.0, 0.0)).unwrap();
/// b.add_link(LinkId(10), NodeId(1), NodeId(2)).unwrap();
/// let net = b.build();
/// assert_eq!(net.link_coord(LinkId(10)).unwrap(), Coord::new(50.0, 0.0));
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    node_pos:   FxHashMap<NodeId, Coord>,
    node_order: Vec<Coord>,
    links:      Vec<Link>,
    link_index: FxHashMap<LinkId, usize>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.  Node ids must be unique.
    pub fn add_node(&mut self, id: NodeId, pos: Coord) -> SpatialResult<()> {
        if self.node_pos.contains_key(&id) {
            return Err(SpatialError::DuplicateNode(id));
        }
        self.node_pos.insert(id, pos);
        self.node_order.push(pos);
        Ok(())
    }

    /// Add a link positioned at the midpoint of its end nodes.
    pub fn add_link(&mut self, id: LinkId, from: NodeId, to: NodeId) -> SpatialResult<()> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        self.add_link_at(id, from, to, a.midpoint(b))
    }

    /// Add a link with an explicit position.  Both end nodes must exist.
    pub fn add_link_at(
        &mut self,
        id:    LinkId,
        from:  NodeId,
        to:    NodeId,
        coord: Coord,
    ) -> SpatialResult<()> {
        self.node(from)?;
        self.node(to)?;
        if self.link_index.contains_key(&id) {
            return Err(SpatialError::DuplicateLink(id));
        }
        self.link_index.insert(id, self.links.len());
        self.links.push(Link { id, from, to, coord });
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.node_pos.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    fn node(&self, id: NodeId) -> SpatialResult<Coord> {
        self.node_pos.get(&id).copied().ok_or(SpatialError::NodeNotFound(id))
    }

    /// Consume the builder, compute the bounding box and bulk-load the R-tree.
    pub fn build(self) -> Network {
        let bbox = BoundingBox::from_points(self.node_order.iter().copied());

        let entries: Vec<LinkEntry> = self
            .links
            .iter()
            .map(|l| LinkEntry { point: [l.coord.x, l.coord.y], id: l.id })
            .collect();
        let link_tree = RTree::bulk_load(entries);

        Network {
            node_pos: self.node_pos,
            links: self.links,
            link_index: self.link_index,
            bbox,
            link_tree,
        }
    }
}
