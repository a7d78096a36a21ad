// src/export.rs
//! Выгрузка готового мира
//!
//! Структурные записи пишутся в JSON (с отступами, порядок элементов — порядок вставки),
//! карта — текстом. Файлы пишутся по очереди: карта, локации, континенты, врата, дороги.
//! Если запись одного файла падает, уже записанные остаются как есть.

use crate::config::GenerationPaths;
use crate::error::{self, GenError};
use crate::grid::{Grid, Tile};
use crate::pipeline::World;
use crate::province::Province;
use crate::subloc::{Subloc, SublocKind};
use crate::terrain::Terrain;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Запись файла локаций: провинция, её особые места и клетки с объектами
#[derive(Debug, Serialize)]
pub struct LocationRecord<'a> {
    #[serde(flatten)]
    pub province: &'a Province,
    pub sublocs: Vec<&'a Subloc>,
    pub features: Vec<TileRecord<'a>>,
}

/// Клетка провинции, на которой есть особое место, врата или конец дороги
#[derive(Debug, Serialize)]
pub struct TileRecord<'a> {
    pub row: usize,
    pub col: usize,
    pub terrain: Terrain,
    pub continent: Option<u32>,
    pub poi: Vec<SublocKind>,
    pub gates: &'a [u32],
    pub roads: &'a [u32],
}

impl<'a> TileRecord<'a> {
    fn from_tile(tile: &'a Tile) -> Option<Self> {
        if tile.poi.is_empty() && tile.gates.is_empty() && tile.roads.is_empty() {
            return None;
        }
        Some(Self {
            row: tile.row,
            col: tile.col,
            terrain: tile.terrain,
            continent: tile.continent,
            poi: tile.poi.kinds().collect(),
            gates: &tile.gates,
            roads: &tile.roads,
        })
    }
}

#[must_use]
pub fn location_records(world: &World) -> Vec<LocationRecord<'_>> {
    world
        .provinces
        .iter()
        .map(|province| LocationRecord {
            province,
            sublocs: world
                .sublocs
                .iter()
                .filter(|s| s.province == province.id)
                .collect(),
            features: province
                .tiles
                .iter()
                .filter_map(|&(row, col)| world.grid.tile(row, col))
                .filter_map(TileRecord::from_tile)
                .collect(),
        })
        .collect()
}

/// Текстовый дамп карты.
///
/// Три блока через пустую строку:
/// 1. строки символов местности;
/// 2. по строке на ряд: id провинций через пробел (`-` для клеток без провинции);
/// 3. по строке на ряд: отметки глубины цифрой (`0` — суша, `-` — нет отметки).
///
/// Чтение шаблона останавливается на первой пустой строке, так что дамп сам
/// является корректным шаблоном.
#[must_use]
pub fn map_dump(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.glyph_rows() {
        out.push_str(&row);
        out.push('\n');
    }
    out.push('\n');
    for row in grid.tiles.chunks(grid.width.max(1)) {
        let ids: Vec<String> = row
            .iter()
            .map(|t| t.region.map_or_else(|| "-".to_string(), |id| id.to_string()))
            .collect();
        out.push_str(&ids.join(" "));
        out.push('\n');
    }
    out.push('\n');
    for row in grid.tiles.chunks(grid.width.max(1)) {
        out.extend(row.iter().map(|t| {
            t.depth
                .and_then(|d| char::from_digit(u32::from(d), 10))
                .unwrap_or('-')
        }));
        out.push('\n');
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> error::Result<String> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| GenError::data(path, e.to_string()))?;
    json.push('\n');
    Ok(json)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> error::Result<()> {
    error::write_string(path, &to_json(value, path)?)
}

/// Записывает все артефакты, кроме файла сида (его пишет сессия)
pub fn export_world(world: &World, paths: &GenerationPaths) -> error::Result<()> {
    error::write_string(&paths.dump, &map_dump(&world.grid))?;
    write_json(&location_records(world), &paths.location)?;
    write_json(&world.continents, &paths.continent)?;
    write_json(&world.gates, &paths.gate)?;
    write_json(&world.roads, &paths.road)?;
    info!(
        "Выгружено: {} провинций, {} континентов, {} врат, {} дорог",
        world.provinces.len(),
        world.continents.len(),
        world.gates.len(),
        world.roads.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_is_a_loadable_template() {
        let mut grid = Grid::parse(".~\n?.\n", Path::new("t.map")).unwrap();
        grid.tiles[0].region = Some(1);
        grid.tiles[3].region = Some(12);
        grid.compute_depths();
        let dump = map_dump(&grid);
        assert_eq!(dump, ".~\n?.\n\n1 -\n- 12\n\n01\n-0\n");

        let reloaded = Grid::parse(&dump, Path::new("dump.map")).unwrap();
        assert_eq!(reloaded.glyph_rows(), grid.glyph_rows());
    }
}
