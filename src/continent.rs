// src/continent.rs
//! Континенты: объединения провинций, связанных сушей или морским путём
//!
//! Континенты не хранятся отдельно от провинций: они пересчитываются, когда
//! распределение провинций окончательно. Морской путь — прямая линия из клетки
//! суши по 4 направлениям через не более чем `sea_lane_reach` клеток воды до
//! клетки другой провинции.

use crate::config::ContinentSettings;
use crate::grid::{DIRECTIONS, Grid};
use crate::province::graph::ProvinceGraph;
use crate::province::{Province, index_by_id};
use log::info;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Continent {
    pub id: u32,
    pub name: String,
    pub province_ids: Vec<u32>,
    /// Суммарная площадь в клетках
    pub area: usize,
}

/// Объединяет провинции в континенты и проставляет `continent` провинциям и клеткам.
///
/// Id континентов идут с 1 по возрастанию наименьшего id провинции.
pub fn assign_continents(
    grid: &mut Grid,
    provinces: &mut [Province],
    graph: &ProvinceGraph,
    settings: &ContinentSettings,
) -> Vec<Continent> {
    let by_id = index_by_id(provinces);
    let mut sets = UnionFind::<usize>::new(provinces.len());

    for &(a, b) in graph.contacts.keys() {
        sets.union(by_id[&a], by_id[&b]);
    }

    if settings.sea_lane_reach > 0 {
        for (a, b) in sea_lanes(grid, settings.sea_lane_reach as usize) {
            if let (Some(&ia), Some(&ib)) = (by_id.get(&a), by_id.get(&b)) {
                sets.union(ia, ib);
            }
        }
    }

    let mut root_to_continent: BTreeMap<usize, usize> = BTreeMap::new();
    let mut continents: Vec<Continent> = Vec::new();
    for (i, province) in provinces.iter_mut().enumerate() {
        let root = sets.find(i);
        let slot = *root_to_continent.entry(root).or_insert_with(|| {
            let id = continents.len() as u32 + 1;
            continents.push(Continent {
                id,
                name: format!("Continent_{id}"),
                province_ids: Vec::new(),
                area: 0,
            });
            continents.len() - 1
        });
        let continent = &mut continents[slot];
        continent.province_ids.push(province.id);
        continent.area += province.area;
        province.continent = Some(continent.id);
    }

    for tile in &mut grid.tiles {
        tile.continent = tile
            .region
            .and_then(|id| by_id.get(&id))
            .and_then(|&i| provinces[i].continent);
    }

    info!("Континентов: {}", continents.len());
    continents
}

/// Пары провинций, связанных морским путём
fn sea_lanes(grid: &Grid, reach: usize) -> Vec<(u32, u32)> {
    let mut lanes = Vec::new();
    for tile in &grid.tiles {
        let Some(from) = tile.region else { continue };
        for &(dr, dc) in &DIRECTIONS {
            for step in 1..=reach + 1 {
                let row = tile.row as isize + dr * step as isize;
                let col = tile.col as isize + dc * step as isize;
                let terrain = grid.terrain_at(row, col);
                if terrain.is_sea() {
                    continue;
                }
                if step > 1
                    && terrain.is_land()
                    && let Some(to) = grid.tile(row as usize, col as usize).and_then(|t| t.region)
                    && to != from
                {
                    lanes.push((from, to));
                }
                break;
            }
        }
    }
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::province::graph::build_province_graph;
    use crate::province::island::build_islands;
    use crate::province::build_provinces;
    use std::path::Path;

    fn world(text: &str, reach: u32) -> (Grid, Vec<Province>, Vec<Continent>) {
        let mut grid = Grid::parse(text, Path::new("t.map")).unwrap();
        let drafts = build_islands(&mut grid, 1);
        let mut provinces = build_provinces(&grid, &drafts);
        let graph = build_province_graph(&grid, &provinces);
        let continents = assign_continents(
            &mut grid,
            &mut provinces,
            &graph,
            &ContinentSettings {
                sea_lane_reach: reach,
            },
        );
        (grid, provinces, continents)
    }

    #[test]
    fn separate_islands_are_separate_continents() {
        let (grid, provinces, continents) = world("..~~.\n..~~.\n", 0);
        assert_eq!(continents.len(), 2);
        assert_eq!(continents[0].province_ids, [1]);
        assert_eq!(continents[0].area, 4);
        assert_eq!(provinces[1].continent, Some(2));
        assert_eq!(grid.tile(0, 4).unwrap().continent, Some(2));
        assert_eq!(grid.tile(0, 2).unwrap().continent, None);
    }

    #[test]
    fn sea_lane_joins_across_narrow_strait() {
        let (_, provinces, continents) = world("..~~.\n..~~.\n", 2);
        assert_eq!(continents.len(), 1);
        assert!(provinces.iter().all(|p| p.continent == Some(1)));
    }

    #[test]
    fn sea_lane_does_not_reach_too_far() {
        let (_, _, continents) = world(".~~~.\n", 2);
        assert_eq!(continents.len(), 2);
    }

    #[test]
    fn adjacent_provinces_share_continent() {
        let mut grid = Grid::parse("....\n", Path::new("t.map")).unwrap();
        grid.tiles[0].region = Some(1);
        grid.tiles[1].region = Some(1);
        let mut drafts = vec![crate::province::ProvinceDraft {
            id: 1,
            name: "a".into(),
            kind: crate::province::ProvinceKind::Authored,
        }];
        drafts.extend(build_islands(&mut grid, 2));
        let mut provinces = build_provinces(&grid, &drafts);
        let graph = build_province_graph(&grid, &provinces);
        let continents = assign_continents(
            &mut grid,
            &mut provinces,
            &graph,
            &ContinentSettings::default(),
        );
        assert_eq!(continents.len(), 1);
        assert_eq!(continents[0].province_ids, [1, 2]);
    }
}
