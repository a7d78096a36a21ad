// src/gate.rs
//! Врата — мгновенные связи между провинциями в обход соседства
//!
//! ## Расход генератора
//! Ничего не тянется, если `count == 0`, `max_out_degree == 0` или провинций меньше двух.
//! На каждую попытку — два индекса провинций (начало, конец). Принятая пара
//! стоит ещё двух розыгрышей: клетка в начальной и клетка в конечной провинции.

use crate::config::GateSettings;
use crate::grid::Grid;
use crate::province::Province;
use crate::rng::Sfc32;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gate {
    pub id: u32,
    pub origin_province: u32,
    pub origin: (usize, usize),
    pub destination_province: u32,
    pub destination: (usize, usize),
    pub bidirectional: bool,
}

pub fn build_gates(
    grid: &mut Grid,
    provinces: &[Province],
    settings: &GateSettings,
    rng: &mut Sfc32,
) -> Vec<Gate> {
    let mut gates = Vec::new();
    if settings.count == 0 || settings.max_out_degree == 0 || provinces.len() < 2 {
        info!("Врата: 0");
        return gates;
    }

    let mut pairs: BTreeSet<(u32, u32)> = BTreeSet::new();
    let mut out_degree = vec![0u32; provinces.len()];

    for _ in 0..settings.count {
        for _ in 0..settings.max_attempts_per_gate {
            let o = rng.index(provinces.len());
            let d = rng.index(provinces.len());
            if o == d {
                continue;
            }
            let (from, to) = (&provinces[o], &provinces[d]);
            if pairs.contains(&(from.id, to.id))
                || (settings.bidirectional && pairs.contains(&(to.id, from.id)))
            {
                continue;
            }
            if out_degree[o] >= settings.max_out_degree
                || (settings.bidirectional && out_degree[d] >= settings.max_out_degree)
            {
                continue;
            }

            let origin = from.tiles[rng.index(from.tiles.len())];
            let destination = to.tiles[rng.index(to.tiles.len())];
            let id = gates.len() as u32 + 1;

            pairs.insert((from.id, to.id));
            out_degree[o] += 1;
            let origin_idx = grid.index(origin.0, origin.1);
            grid.tiles[origin_idx].gates.push(id);
            if settings.bidirectional {
                pairs.insert((to.id, from.id));
                out_degree[d] += 1;
                let dest_idx = grid.index(destination.0, destination.1);
                grid.tiles[dest_idx].gates.push(id);
            }

            debug!("Врата {id}: {} -> {}", from.id, to.id);
            gates.push(Gate {
                id,
                origin_province: from.id,
                origin,
                destination_province: to.id,
                destination,
                bidirectional: settings.bidirectional,
            });
            break;
        }
    }

    info!("Врата: {}", gates.len());
    gates
}
