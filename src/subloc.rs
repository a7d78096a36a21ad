// src/subloc.rs
//! Особые места внутри провинций: города, кладбища, руины, башни, пещеры
//!
//! Сначала ставятся авторские города из файла городов, затем провинции обходятся
//! по возрастанию id, и в каждой делается `max_per_province` попыток.
//!
//! ## Расход генератора на одну попытку
//! 1. `Range(1, 100)` — бросок плотности (дальше только если `<= density`);
//! 2. `Range(0, сумма весов - 1)` — вид места по пригодности местности
//!    (нет розыгрыша, если сумма весов нулевая);
//! 3. `Range(0, кандидатов - 1)` — клетка, если кандидаты есть.
//!
//! Вид, конфликтующий с уже имеющимся в провинции, пропускается после шага 2.

use crate::config::SublocSettings;
use crate::error::{self, GenError};
use crate::grid::Grid;
use crate::province::{Province, index_by_id};
use crate::rng::Sfc32;
use crate::terrain::Terrain;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SublocKind {
    City,
    Graveyard,
    Ruins,
    Tower,
    Cave,
}

impl SublocKind {
    pub const COUNT: usize = 5;

    pub const ALL: [SublocKind; Self::COUNT] = [
        SublocKind::City,
        SublocKind::Graveyard,
        SublocKind::Ruins,
        SublocKind::Tower,
        SublocKind::Cave,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Виды, которые не уживаются в одной провинции
    #[must_use]
    pub fn conflicts_with(self, other: SublocKind) -> bool {
        use SublocKind::{City, Graveyard, Ruins};
        matches!(
            (self, other),
            (City, City) | (City, Ruins) | (Ruins, City) | (Graveyard, Graveyard)
        )
    }

    /// Вес пригодности для преобладающей местности провинции (0 — нельзя)
    #[must_use]
    pub fn suitability(self, terrain: Terrain) -> u32 {
        use Terrain::{Desert, Forest, Hill, Mountain, Plain, Swamp};
        match (self, terrain) {
            (SublocKind::City, Plain) => 6,
            (SublocKind::City, Hill) => 3,
            (SublocKind::City, Forest) => 2,
            (SublocKind::City, Desert | Swamp) => 1,
            (SublocKind::Graveyard, Plain | Swamp) => 3,
            (SublocKind::Graveyard, Forest | Hill | Desert) => 2,
            (SublocKind::Graveyard, Mountain) => 1,
            (SublocKind::Ruins, Desert) => 4,
            (SublocKind::Ruins, Forest | Hill | Swamp | Mountain) => 2,
            (SublocKind::Ruins, Plain) => 1,
            (SublocKind::Tower, Mountain) => 4,
            (SublocKind::Tower, Hill) => 3,
            (SublocKind::Tower, Plain | Forest | Desert) => 1,
            (SublocKind::Cave, Mountain) => 5,
            (SublocKind::Cave, Hill) => 3,
            (SublocKind::Cave, Forest | Desert) => 1,
            _ => 0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SublocKind::City => "City",
            SublocKind::Graveyard => "Graveyard",
            SublocKind::Ruins => "Ruins",
            SublocKind::Tower => "Tower",
            SublocKind::Cave => "Cave",
        }
    }
}

/// Флаги особых мест клетки: по одному на вид
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoiFlags([bool; SublocKind::COUNT]);

impl PoiFlags {
    pub fn set(&mut self, kind: SublocKind) {
        self.0[kind.index()] = true;
    }

    #[must_use]
    pub fn contains(&self, kind: SublocKind) -> bool {
        self.0[kind.index()]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&f| f)
    }

    /// Отмеченные виды в порядке объявления
    pub fn kinds(&self) -> impl Iterator<Item = SublocKind> + '_ {
        SublocKind::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subloc {
    pub id: u32,
    pub kind: SublocKind,
    pub name: String,
    pub province: u32,
    pub row: usize,
    pub col: usize,
    /// Задан в файле городов
    pub authored: bool,
}

/// Авторский город
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CitySeed {
    pub name: String,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Default, Deserialize)]
struct CityFile {
    #[serde(default)]
    city: Vec<CitySeed>,
}

pub fn load_city_seeds(path: &Path) -> error::Result<Vec<CitySeed>> {
    let contents = error::read_to_string(path)?;
    parse_city_seeds(&contents, path)
}

pub fn parse_city_seeds(contents: &str, source: &Path) -> error::Result<Vec<CitySeed>> {
    let file: CityFile =
        toml::from_str(contents).map_err(|e| GenError::data(source, e.to_string()))?;
    Ok(file.city)
}

/// Ставит авторские города; клетка должна быть сушей без другого места
pub fn place_authored_cities(
    grid: &mut Grid,
    cities: &[CitySeed],
    source: &Path,
) -> error::Result<Vec<Subloc>> {
    let mut placed = Vec::with_capacity(cities.len());
    for city in cities {
        let fail = |detail: &str| {
            GenError::data(
                source,
                format!("city {:?} at ({}, {}): {detail}", city.name, city.row, city.col),
            )
        };
        if !grid.in_bounds(city.row, city.col) {
            return Err(fail("outside the map"));
        }
        let idx = grid.index(city.row, city.col);
        let tile = &mut grid.tiles[idx];
        let Some(province) = tile.region else {
            return Err(fail("not on land"));
        };
        if !tile.poi.is_empty() {
            return Err(fail("tile already holds a city"));
        }
        tile.poi.set(SublocKind::City);
        placed.push(Subloc {
            id: placed.len() as u32 + 1,
            kind: SublocKind::City,
            name: city.name.clone(),
            province,
            row: city.row,
            col: city.col,
            authored: true,
        });
    }
    Ok(placed)
}

/// Случайное размещение особых мест; дописывает в `sublocs` (там уже авторские города)
pub fn place_sublocs(
    grid: &mut Grid,
    provinces: &[Province],
    settings: &SublocSettings,
    sublocs: &mut Vec<Subloc>,
    rng: &mut Sfc32,
) {
    let authored = sublocs.len();
    let by_id = index_by_id(provinces);
    let mut held: Vec<Vec<SublocKind>> = vec![Vec::new(); provinces.len()];
    for subloc in sublocs.iter() {
        if let Some(&i) = by_id.get(&subloc.province) {
            held[i].push(subloc.kind);
        }
    }

    for (i, province) in provinces.iter().enumerate() {
        for _ in 0..settings.max_per_province {
            if held[i].len() >= settings.max_per_province as usize {
                break;
            }
            if !rng.percent(settings.density) {
                continue;
            }
            let Some(kind) = pick_kind(province.terrain, rng) else {
                continue;
            };
            if held[i].iter().any(|&h| kind.conflicts_with(h)) {
                debug!("Провинция {}: {:?} конфликтует", province.id, kind);
                continue;
            }

            let candidates = candidate_tiles(grid, province, sublocs, settings.min_spacing);
            if candidates.is_empty() {
                continue;
            }
            let (row, col) = candidates[rng.index(candidates.len())];

            let id = sublocs.len() as u32 + 1;
            let idx = grid.index(row, col);
            grid.tiles[idx].poi.set(kind);
            held[i].push(kind);
            sublocs.push(Subloc {
                id,
                kind,
                name: format!("{} {id}", kind.label()),
                province: province.id,
                row,
                col,
                authored: false,
            });
        }
    }

    info!(
        "Особые места: {} авторских, {} случайных",
        authored,
        sublocs.len() - authored
    );
}

/// Взвешенный выбор вида; `None`, если местность не подходит ни для чего
fn pick_kind(terrain: Terrain, rng: &mut Sfc32) -> Option<SublocKind> {
    let total: u32 = SublocKind::ALL.iter().map(|k| k.suitability(terrain)).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.range(0, total as i32 - 1) as u32;
    for kind in SublocKind::ALL {
        let weight = kind.suitability(terrain);
        if roll < weight {
            return Some(kind);
        }
        roll -= weight;
    }
    None
}

fn candidate_tiles(
    grid: &Grid,
    province: &Province,
    placed: &[Subloc],
    min_spacing: u32,
) -> Vec<(usize, usize)> {
    province
        .tiles
        .iter()
        .copied()
        .filter(|&(row, col)| {
            grid.tile(row, col).is_some_and(|t| t.poi.is_empty())
                && placed
                    .iter()
                    .all(|s| (row.abs_diff(s.row) + col.abs_diff(s.col)) as u32 >= min_spacing)
        })
        .collect()
}
