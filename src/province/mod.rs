pub mod authored;
pub mod clump;
pub mod graph;
pub mod island;

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::Grid;
use crate::terrain::Terrain;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvinceKind {
    /// Задана вручную в файле регионов
    Authored,
    /// Собрана кластеризацией
    Continental,
    /// Остаток суши, подобранный после кластеризации
    Island,
}

/// Провинция до подсчёта сводки: только то, что знает этап, который её создал
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceDraft {
    pub id: u32,
    pub name: String,
    pub kind: ProvinceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Province {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProvinceKind,
    pub color: String, // "#rrggbb"
    /// Преобладающая местность
    pub terrain: Terrain,
    pub continent: Option<u32>,
    pub center: (f32, f32),
    pub area: usize,
    /// Клетки `(row, col)` в порядке обхода по строкам; первая — опорная
    pub tiles: Vec<(usize, usize)>,
}

impl Province {
    /// Опорная клетка (первая по строкам)
    #[must_use]
    pub fn anchor(&self) -> (usize, usize) {
        self.tiles[0]
    }
}

/// Детерминированный цвет провинции по её id (без генератора)
#[must_use]
pub fn province_color(id: u32) -> String {
    let r = 100 + (id.wrapping_mul(37) % 120);
    let g = 120 + (id.wrapping_mul(73) % 135);
    let b = 50 + (id.wrapping_mul(151) % 50);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Собирает итоговые провинции по назначенным клеткам.
///
/// Результат отсортирован по id. Черновики без единой клетки отбрасываются.
#[must_use]
pub fn build_provinces(grid: &Grid, drafts: &[ProvinceDraft]) -> Vec<Province> {
    let members = grid.region_members();

    let mut drafts: Vec<&ProvinceDraft> = drafts
        .iter()
        .filter(|d| members.contains_key(&d.id))
        .collect();
    drafts.sort_by_key(|d| d.id);

    let summary = |draft: &&ProvinceDraft| summarize(grid, draft, &members[&draft.id]);

    #[cfg(feature = "parallel")]
    let provinces = drafts.par_iter().map(summary).collect();
    #[cfg(not(feature = "parallel"))]
    let provinces = drafts.iter().map(summary).collect();

    provinces
}

fn summarize(grid: &Grid, draft: &ProvinceDraft, indices: &BTreeSet<usize>) -> Province {
    let tiles: Vec<(usize, usize)> = indices
        .iter()
        .map(|&i| (grid.tiles[i].row, grid.tiles[i].col))
        .collect();
    let area = tiles.len();

    let sum_row: f32 = tiles.iter().map(|t| t.0 as f32).sum();
    let sum_col: f32 = tiles.iter().map(|t| t.1 as f32).sum();

    let mut counts = [0usize; Terrain::LAND.len()];
    for &i in indices {
        if let Some(k) = Terrain::LAND
            .iter()
            .position(|&t| t == grid.tiles[i].terrain)
        {
            counts[k] += 1;
        }
    }
    // max_by_key отдаёт последний максимум, поэтому идём с конца
    let dominant = (0..counts.len())
        .rev()
        .max_by_key(|&k| counts[k])
        .map_or(Terrain::Plain, |k| Terrain::LAND[k]);

    Province {
        id: draft.id,
        name: draft.name.clone(),
        kind: draft.kind,
        color: province_color(draft.id),
        terrain: dominant,
        continent: None,
        center: (sum_row / area as f32, sum_col / area as f32),
        area,
        tiles,
    }
}

/// Быстрый доступ: id провинции → индекс в отсортированном списке
#[must_use]
pub fn index_by_id(provinces: &[Province]) -> BTreeMap<u32, usize> {
    provinces
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect()
}
