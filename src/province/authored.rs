// src/province/authored.rs
//! Ручные провинции из файла регионов
//!
//! Файл регионов (TOML) заранее закрепляет клетки за провинциями до кластеризации:
//! ```toml
//! [[region]]
//! id = 1
//! name = "Imperial Heartland"
//! tiles = [[0, 0], [0, 1], [1, 1]]
//! ```
//! Любая ошибка в файле фатальна: разумной формы мира по умолчанию нет.

use crate::error::{self, GenError};
use crate::grid::Grid;
use crate::province::{ProvinceDraft, ProvinceKind};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionSeed {
    pub id: u32,
    pub name: String,
    /// Клетки `[row, col]`
    pub tiles: Vec<[usize; 2]>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionFile {
    #[serde(default)]
    region: Vec<RegionSeed>,
}

pub fn load_region_seeds(path: &Path) -> error::Result<Vec<RegionSeed>> {
    let contents = error::read_to_string(path)?;
    parse_region_seeds(&contents, path)
}

pub fn parse_region_seeds(contents: &str, source: &Path) -> error::Result<Vec<RegionSeed>> {
    let file: RegionFile =
        toml::from_str(contents).map_err(|e| GenError::data(source, e.to_string()))?;
    Ok(file.region)
}

/// Закрепляет клетки за ручными провинциями.
///
/// Проверяет: id не 0 и уникален, список клеток не пуст, каждая клетка внутри сетки,
/// на суше и занята один раз, а сама провинция связна по 4 соседям.
///
/// Сверху id ограничен так, чтобы после него хватило места под провинции, которые
/// достроят кластеризация и острова: каждой нужна хотя бы одна клетка суши.
pub fn assign_regions(
    grid: &mut Grid,
    seeds: &[RegionSeed],
    source: &Path,
) -> error::Result<Vec<ProvinceDraft>> {
    let land = grid.tiles.iter().filter(|t| t.terrain.is_land()).count();
    let max_id = u32::MAX - u32::try_from(land).unwrap_or(u32::MAX);
    let mut ids = HashSet::new();
    let mut claimed = HashSet::new();
    let mut drafts = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let fail = |detail: String| GenError::data(source, format!("region {}: {detail}", seed.id));

        if seed.id == 0 {
            return Err(fail("id 0 is reserved".into()));
        }
        if seed.id > max_id {
            return Err(fail(format!(
                "id leaves no room for generated provinces (max {max_id})"
            )));
        }
        if !ids.insert(seed.id) {
            return Err(fail("duplicate id".into()));
        }
        if seed.tiles.is_empty() {
            return Err(fail("no tiles".into()));
        }

        let mut members = BTreeSet::new();
        for &[row, col] in &seed.tiles {
            if !grid.in_bounds(row, col) {
                return Err(fail(format!("tile ({row}, {col}) is outside the map")));
            }
            let idx = grid.index(row, col);
            if !grid.tiles[idx].terrain.is_land() {
                return Err(fail(format!("tile ({row}, {col}) is not land")));
            }
            if !claimed.insert(idx) {
                return Err(fail(format!("tile ({row}, {col}) is already claimed")));
            }
            members.insert(idx);
        }

        if !grid.is_connected(&members) {
            return Err(fail("tiles are not 4-connected".into()));
        }

        for &idx in &members {
            grid.tiles[idx].region = Some(seed.id);
        }
        drafts.push(ProvinceDraft {
            id: seed.id,
            name: seed.name.clone(),
            kind: ProvinceKind::Authored,
        });
    }

    info!("Ручных провинций: {}", drafts.len());
    Ok(drafts)
}

/// Первый свободный id после ручных провинций
#[must_use]
pub fn next_free_id(drafts: &[ProvinceDraft]) -> u32 {
    drafts.iter().map(|d| d.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::parse("...~\n...~\n~~~~\n", Path::new("t.map")).unwrap()
    }

    fn assign(text: &str) -> error::Result<Vec<ProvinceDraft>> {
        let source = Path::new("regions.toml");
        let seeds = parse_region_seeds(text, source)?;
        assign_regions(&mut grid(), &seeds, source)
    }

    #[test]
    fn assigns_tiles_and_keeps_ids() {
        let mut grid = grid();
        let seeds = parse_region_seeds(
            "[[region]]\nid = 5\nname = \"Heart\"\ntiles = [[0, 0], [0, 1], [1, 1]]\n",
            Path::new("regions.toml"),
        )
        .unwrap();
        let drafts = assign_regions(&mut grid, &seeds, Path::new("regions.toml")).unwrap();
        assert_eq!(drafts[0].id, 5);
        assert_eq!(drafts[0].kind, ProvinceKind::Authored);
        assert_eq!(grid.tile(1, 1).unwrap().region, Some(5));
        assert_eq!(grid.tile(1, 0).unwrap().region, None);
        assert_eq!(next_free_id(&drafts), 6);
    }

    #[test]
    fn empty_file_is_valid() {
        assert!(assign("").unwrap().is_empty());
        assert_eq!(next_free_id(&[]), 1);
    }

    #[test]
    fn malformed_metadata_is_fatal() {
        let cases = [
            "[[region]]\nid = 0\nname = \"a\"\ntiles = [[0, 0]]\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = [[0, 0]]\n[[region]]\nid = 1\nname = \"b\"\ntiles = [[0, 2]]\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = []\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = [[9, 9]]\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = [[0, 3]]\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = [[0, 0]]\n[[region]]\nid = 2\nname = \"b\"\ntiles = [[0, 0]]\n",
            "[[region]]\nid = 1\nname = \"a\"\ntiles = [[0, 0], [1, 2]]\n",
            "[[region]]\nid = \"x\"\n",
            "[[region]]\nid = 4294967295\nname = \"a\"\ntiles = [[0, 0]]\n",
        ];
        for text in cases {
            let err = assign(text).unwrap_err();
            assert!(matches!(err, GenError::Data { .. }), "{text}");
        }
    }

    #[test]
    fn ids_near_the_top_leave_room_for_generated_provinces() {
        // шесть клеток суши: старший допустимый id — u32::MAX - 6
        let top = u32::MAX - 6;
        let ok = format!("[[region]]\nid = {top}\nname = \"a\"\ntiles = [[0, 0]]\n");
        let drafts = assign(&ok).unwrap();
        assert_eq!(next_free_id(&drafts), top + 1);

        let over = format!("[[region]]\nid = {}\nname = \"a\"\ntiles = [[0, 0]]\n", top + 1);
        let err = assign(&over).unwrap_err();
        assert!(err.to_string().contains("no room"), "{err}");
    }
}
