use crate::grid::Grid;
use crate::province::Province;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Граф сухопутного соседства провинций
///
/// Узлы добавляются в порядке id, поэтому `NodeIndex(i)` — это `provinces[i]`.
#[derive(Debug, Clone)]
pub struct ProvinceGraph {
    pub graph: UnGraph<u32, ()>,
    /// Первая точка контакта каждой пары `(меньший id, больший id)`:
    /// клетка меньшей провинции и соседняя клетка большей
    pub contacts: BTreeMap<(u32, u32), (usize, usize)>,
}

impl ProvinceGraph {
    #[must_use]
    pub fn node(&self, province_index: usize) -> NodeIndex {
        NodeIndex::new(province_index)
    }
}

pub fn build_province_graph(grid: &Grid, provinces: &[Province]) -> ProvinceGraph {
    let mut graph = UnGraph::new_undirected();
    let mut id_to_node = BTreeMap::new();
    for province in provinces {
        let node = graph.add_node(province.id);
        id_to_node.insert(province.id, node);
    }

    let mut contacts = BTreeMap::new();

    for (idx, tile) in grid.tiles.iter().enumerate() {
        let Some(id) = tile.region else { continue };
        for nidx in grid.neighbors(idx) {
            let Some(n_id) = grid.tiles[nidx].region else {
                continue;
            };
            if n_id == id {
                continue;
            }
            let (key, contact) = if id < n_id {
                ((id, n_id), (idx, nidx))
            } else {
                ((n_id, id), (nidx, idx))
            };
            if let Entry::Vacant(slot) = contacts.entry(key) {
                slot.insert(contact);
                if let (Some(&a), Some(&b)) = (id_to_node.get(&key.0), id_to_node.get(&key.1)) {
                    graph.add_edge(a, b, ());
                }
            }
        }
    }

    ProvinceGraph { graph, contacts }
}
