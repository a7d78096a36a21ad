// src/normalize.rs
//! Исправление шума береговой линии
//!
//! Один проход по строкам, изменения применяются сразу:
//! - одиночная клетка воды, все известные соседи которой — суша, становится сушей
//!   (самый частый тип соседей, ничья — по порядку С, В, Ю, З);
//! - клетка суши на краю сетки, все известные соседи которой — вода, становится океаном.
//!
//! Изменение клетки никогда не делает подходящей другую клетку, поэтому
//! повторный проход ничего не меняет.

use crate::grid::Grid;
use crate::terrain::Terrain;
use log::{debug, info};

/// Возвращает количество изменённых клеток
pub fn normalize_terrain(grid: &mut Grid) -> usize {
    let mut changed = 0;

    for idx in 0..grid.tiles.len() {
        let known: Vec<Terrain> = grid
            .neighbors(idx)
            .map(|n| grid.tiles[n].terrain)
            .filter(|t| t.is_land() || t.is_sea())
            .collect();
        if known.is_empty() {
            continue;
        }

        let current = grid.tiles[idx].terrain;
        let replacement = if current.is_sea() && known.iter().all(|t| t.is_land()) {
            Some(most_common(&known))
        } else if current.is_land() && grid.is_border(idx) && known.iter().all(|t| t.is_sea()) {
            Some(Terrain::Ocean)
        } else {
            None
        };

        if let Some(terrain) = replacement {
            let tile = &mut grid.tiles[idx];
            debug!(
                "Клетка ({}, {}): {:?} -> {:?}",
                tile.row, tile.col, tile.terrain, terrain
            );
            tile.terrain = terrain;
            changed += 1;
        }
    }

    info!("Нормализация береговой линии: исправлено {changed} клеток");
    changed
}

/// Самый частый элемент; при равенстве — встретившийся первым
fn most_common(terrains: &[Terrain]) -> Terrain {
    let mut best = terrains[0];
    let mut best_count = 0;
    for &candidate in terrains {
        let count = terrains.iter().filter(|&&t| t == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
