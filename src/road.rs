// src/road.rs
//! Дорожная сеть между провинциями
//!
//! 1. Дороги между соседними провинциями (пары по возрастанию `(меньший id, больший id)`),
//!    каждая с шансом `adjacent_chance` — один `Range(1, 100)` на пару, если шанс ниже 100.
//! 2. Дальние дороги: `long_links` штук, попытка — два индекса провинций.
//! 3. Починка связности: компоненты ведутся в системе непересекающихся множеств,
//!    которая пополняется с каждой дорогой. Достижимая часть — компонента провинции
//!    с наименьшим id; пока есть другие, самая маленькая из них соединяется с ближайшей
//!    (по центрам) достижимой провинцией. Генератор здесь не используется.
//!
//! После починки граф провинций всегда связен.

use crate::config::RoadSettings;
use crate::grid::Grid;
use crate::province::graph::ProvinceGraph;
use crate::province::{Province, index_by_id};
use crate::rng::Sfc32;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadKind {
    Adjacent,
    LongRange,
    Repair,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadEdge {
    pub id: u32,
    pub from: u32,
    pub to: u32,
    pub from_tile: (usize, usize),
    pub to_tile: (usize, usize),
    pub kind: RoadKind,
    /// Стоимость перехода в днях
    pub cost: u32,
}

struct RoadBuilder<'a> {
    grid: &'a mut Grid,
    provinces: &'a [Province],
    links: UnionFind<usize>,
    pairs: BTreeSet<(usize, usize)>,
    roads: Vec<RoadEdge>,
}

impl RoadBuilder<'_> {
    fn has(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    fn add(&mut self, a: usize, b: usize, tiles: ((usize, usize), (usize, usize)), kind: RoadKind) {
        let id = self.roads.len() as u32 + 1;
        let provinces = self.provinces;
        let (pa, pb) = (&provinces[a], &provinces[b]);
        let cost = pa
            .terrain
            .move_cost()
            .max(pb.terrain.move_cost())
            .unwrap_or(1);

        self.pairs.insert((a.min(b), a.max(b)));
        self.links.union(a, b);
        for (row, col) in [tiles.0, tiles.1] {
            let idx = self.grid.index(row, col);
            self.grid.tiles[idx].roads.push(id);
        }

        debug!("Дорога {id} ({kind:?}): {} - {}", pa.id, pb.id);
        self.roads.push(RoadEdge {
            id,
            from: pa.id,
            to: pb.id,
            from_tile: tiles.0,
            to_tile: tiles.1,
            kind,
            cost,
        });
    }

    /// Компоненты связности: члены по возрастанию, компоненты по наименьшему члену
    fn components(&self) -> Vec<Vec<usize>> {
        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..self.provinces.len() {
            by_root.entry(self.links.find(i)).or_default().push(i);
        }
        let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
        components.sort_unstable_by_key(|c| c[0]);
        components
    }

    fn distance2(&self, a: usize, b: usize) -> f32 {
        let (ca, cb) = (self.provinces[a].center, self.provinces[b].center);
        (ca.0 - cb.0).powi(2) + (ca.1 - cb.1).powi(2)
    }
}

pub fn build_roads(
    grid: &mut Grid,
    provinces: &[Province],
    adjacency: &ProvinceGraph,
    settings: &RoadSettings,
    rng: &mut Sfc32,
) -> Vec<RoadEdge> {
    let mut builder = RoadBuilder {
        grid,
        provinces,
        links: UnionFind::new(provinces.len()),
        pairs: BTreeSet::new(),
        roads: Vec::new(),
    };

    // Провинции отсортированы по id
    let index_of = |id: u32| provinces.binary_search_by_key(&id, |p| p.id).ok();

    for (&(a, b), &(tile_a, tile_b)) in &adjacency.contacts {
        if settings.adjacent_chance < 100 && !rng.percent(settings.adjacent_chance) {
            continue;
        }
        if let (Some(ia), Some(ib)) = (index_of(a), index_of(b)) {
            let tiles = (
                (builder.grid.tiles[tile_a].row, builder.grid.tiles[tile_a].col),
                (builder.grid.tiles[tile_b].row, builder.grid.tiles[tile_b].col),
            );
            builder.add(ia, ib, tiles, RoadKind::Adjacent);
        }
    }

    if provinces.len() >= 2 {
        for _ in 0..settings.long_links {
            for _ in 0..settings.max_attempts_per_link {
                let a = rng.index(provinces.len());
                let b = rng.index(provinces.len());
                if a == b || builder.has(a, b) {
                    continue;
                }
                let tiles = (provinces[a].anchor(), provinces[b].anchor());
                builder.add(a, b, tiles, RoadKind::LongRange);
                break;
            }
        }
    }

    let mut components = builder.components();
    let mut reached = if components.is_empty() {
        Vec::new()
    } else {
        components.remove(0)
    };
    let mut repairs = 0;
    loop {
        let Some(pos) =
            (0..components.len()).min_by_key(|&i| (components[i].len(), components[i][0]))
        else {
            break;
        };
        let island = components.swap_remove(pos);

        let mut best: Option<(f32, usize, usize)> = None;
        for &m in &island {
            for &r in &reached {
                let d = builder.distance2(m, r);
                let better = match best {
                    None => true,
                    Some((bd, bm, br)) => d.total_cmp(&bd).then((m, r).cmp(&(bm, br))).is_lt(),
                };
                if better {
                    best = Some((d, m, r));
                }
            }
        }

        let Some((_, m, r)) = best else { break };
        let tiles = (provinces[r].anchor(), provinces[m].anchor());
        builder.add(r, m, tiles, RoadKind::Repair);
        reached.extend(island);
        repairs += 1;
    }
    debug_assert!(connects_all(provinces, &builder.roads));

    info!(
        "Дороги: {} (из них починка связности: {repairs})",
        builder.roads.len()
    );
    builder.roads
}

/// Связывают ли дороги все провинции в одну компоненту
#[must_use]
pub fn connects_all(provinces: &[Province], roads: &[RoadEdge]) -> bool {
    let by_id = index_by_id(provinces);
    let mut links = UnionFind::<usize>::new(provinces.len());
    for road in roads {
        if let (Some(&a), Some(&b)) = (by_id.get(&road.from), by_id.get(&road.to)) {
            links.union(a, b);
        }
    }
    (1..provinces.len()).all(|i| links.equiv(0, i))
}
