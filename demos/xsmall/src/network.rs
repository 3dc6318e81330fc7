//! Synthetic street grid used by the demo.
//!
//! A 6 × 6 lattice of nodes, 250 m apart, in CH1903+ coordinates around
//! Zürich Hauptbahnhof.  Every pair of horizontal or vertical neighbours is
//! joined by one link in each direction.

use ec_core::{Coord, LinkId, NodeId};
use ec_spatial::{Network, NetworkBuilder, SpatialResult};

pub const SIDE:    u32 = 6;
pub const SPACING: f64 = 250.0;
const ORIGIN:      Coord = Coord::new(2_682_500.0, 1_247_500.0);

fn node_id(col: u32, row: u32) -> NodeId {
    NodeId(row * SIDE + col)
}

/// Build the lattice.  Returns the network and all link ids.
pub fn build_network() -> SpatialResult<(Network, Vec<LinkId>)> {
    let mut b = NetworkBuilder::new();
    for row in 0..SIDE {
        for col in 0..SIDE {
            let pos = Coord::new(
                ORIGIN.x + f64::from(col) * SPACING,
                ORIGIN.y + f64::from(row) * SPACING,
            );
            b.add_node(node_id(col, row), pos)?;
        }
    }

    let mut links = Vec::new();
    let mut next = 0u32;
    let mut road = |b: &mut NetworkBuilder, a: NodeId, c: NodeId| -> SpatialResult<()> {
        for (from, to) in [(a, c), (c, a)] {
            let id = LinkId(next);
            next += 1;
            b.add_link(id, from, to)?;
            links.push(id);
        }
        Ok(())
    };
    for row in 0..SIDE {
        for col in 0..SIDE {
            if col + 1 < SIDE {
                road(&mut b, node_id(col, row), node_id(col + 1, row))?;
            }
            if row + 1 < SIDE {
                road(&mut b, node_id(col, row), node_id(col, row + 1))?;
            }
        }
    }

    Ok((b.build(), links))
}
