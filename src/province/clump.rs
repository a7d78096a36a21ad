// src/province/clump.rs
//! Кластеризация свободной суши в провинции
//!
//! Обход стартовых клеток — по строкам. Каждый кластер растёт из стартовой клетки
//! через случайно выбираемые клетки фронта, поэтому провинции получаются неровными.
//!
//! ## Расход генератора (на каждый кластер, в порядке обнаружения)
//! 1. `Range(min_size, max_size)` — целевой размер;
//! 2. `Range(0, len(фронт) - 1)` — на каждом шаге роста, даже если в фронте одна клетка.
//!
//! Выбранная клетка удаляется из фронта с сохранением порядка, назначается провинции,
//! затем в конец фронта добавляются её свободные соседи-суша в порядке С, В, Ю, З.
//! Кластер меньше `min_size` (свободная суша кончилась раньше) распускается: id не
//! расходуется, клетки достаются этапу островов.

use crate::config::ClumpSettings;
use crate::grid::Grid;
use crate::province::{ProvinceDraft, ProvinceKind};
use crate::rng::Sfc32;
use log::{debug, info};

pub fn clump_provinces(
    grid: &mut Grid,
    settings: &ClumpSettings,
    first_id: u32,
    rng: &mut Sfc32,
) -> Vec<ProvinceDraft> {
    let total = grid.tiles.len();
    let mut released = vec![false; total];
    // Метка кластера, в чей фронт клетка уже попала
    let mut queued = vec![0u32; total];
    let mut stamp = 0u32;
    let mut next_id = first_id;
    let mut drafts = Vec::new();
    let mut released_count = 0usize;

    for start in 0..total {
        if !is_free(grid, &released, start) {
            continue;
        }

        stamp += 1;
        let target = rng.range(settings.min_size as i32, settings.max_size as i32) as usize;
        let mut frontier = vec![start];
        queued[start] = stamp;
        let mut members = Vec::with_capacity(target);

        while members.len() < target && !frontier.is_empty() {
            let idx = frontier.remove(rng.index(frontier.len()));
            grid.tiles[idx].region = Some(next_id);
            members.push(idx);

            let neighbors: Vec<usize> = grid.neighbors(idx).collect();
            for n in neighbors {
                if queued[n] != stamp && is_free(grid, &released, n) {
                    queued[n] = stamp;
                    frontier.push(n);
                }
            }
        }

        if members.len() < settings.min_size as usize {
            for &idx in &members {
                grid.tiles[idx].region = None;
                released[idx] = true;
            }
            released_count += members.len();
            continue;
        }

        debug!(
            "Провинция {next_id}: {} клеток (цель {target})",
            members.len()
        );
        drafts.push(ProvinceDraft {
            id: next_id,
            name: format!("Province_{next_id}"),
            kind: ProvinceKind::Continental,
        });
        next_id += 1;
    }

    info!(
        "Кластеризация: {} провинций, {released_count} клеток оставлено островам",
        drafts.len()
    );
    drafts
}

fn is_free(grid: &Grid, released: &[bool], idx: usize) -> bool {
    let tile = &grid.tiles[idx];
    tile.terrain.is_land() && tile.region.is_none() && !released[idx]
}
