//! Network CSV loader.
//!
//! Two files: nodes and links.  A link is placed at the midpoint of its end
//! nodes.
//!
//! ```csv
//! node_id,x,y
//! 1,2683000.0,1247000.0
//! 2,2683250.0,1247000.0
//! ```
//!
//! ```csv
//! link_id,from_node,to_node
//! 10,1,2
//! 11,2,1
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ec_core::{Coord, LinkId, NodeId};
use ec_spatial::{Network, NetworkBuilder};

use crate::IoResult;

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    x:       f64,
    y:       f64,
}

#[derive(Deserialize)]
struct LinkRecord {
    link_id:   u32,
    from_node: u32,
    to_node:   u32,
}

/// Load a [`Network`] from a node file and a link file.
pub fn load_network_csv(nodes: &Path, links: &Path) -> IoResult<Network> {
    let net = load_network_readers(std::fs::File::open(nodes)?, std::fs::File::open(links)?)?;
    tracing::info!(
        nodes = net.node_count(),
        links = net.link_count(),
        "loaded network"
    );
    Ok(net)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_readers<N: Read, L: Read>(nodes: N, links: L) -> IoResult<Network> {
    let mut b = NetworkBuilder::new();

    let mut node_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let n = result?;
        b.add_node(NodeId(n.node_id), Coord::new(n.x, n.y))?;
    }

    let mut link_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(links);
    for result in link_reader.deserialize::<LinkRecord>() {
        let l = result?;
        b.add_link(LinkId(l.link_id), NodeId(l.from_node), NodeId(l.to_node))?;
    }

    Ok(b.build())
}
