// src/grid.rs
//! Сетка клеток и загрузка ASCII-шаблона
//!
//! Шаблон — текст UTF-8, каждая строка — ряд символов местности (см. [`Terrain::from_glyph`]).
//! Чтение останавливается на первой пустой строке: всё после неё игнорируется.
//! Ширина сетки — длина самой длинной строки в кодовых точках, короткие строки
//! добиваются символом [`crate::terrain::UNKNOWN_GLYPH`].

use crate::error::{self, GenError};
use crate::subloc::PoiFlags;
use crate::terrain::Terrain;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::Path;

/// Соседи в фиксированном порядке: север, восток, юг, запад
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Максимальная отметка глубины моря
pub const MAX_DEPTH: u8 = 9;

#[derive(Debug, Clone)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub terrain: Terrain,
    /// Провинция; `None` до назначения (и навсегда для воды)
    pub region: Option<u32>,
    pub continent: Option<u32>,
    pub poi: PoiFlags,
    /// Исходящие врата (id)
    pub gates: Vec<u32>,
    /// Дороги, у которых эта клетка — конечная точка (id)
    pub roads: Vec<u32>,
    /// Расстояние до ближайшей суши для воды, 0 для суши
    pub depth: Option<u8>,
}

impl Tile {
    fn new(row: usize, col: usize, terrain: Terrain) -> Self {
        Self {
            row,
            col,
            terrain,
            region: None,
            continent: None,
            poi: PoiFlags::default(),
            gates: Vec::new(),
            roads: Vec::new(),
            depth: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    /// Клетки по строкам: индекс `row * width + col`
    pub tiles: Vec<Tile>,
}

impl Grid {
    /// Собирает прямоугольную сетку, добивая короткие ряды `Unknown`
    #[must_use]
    pub fn from_rows(rows: &[Vec<Terrain>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.iter().enumerate() {
            for col in 0..width {
                let terrain = cells.get(col).copied().unwrap_or(Terrain::Unknown);
                tiles.push(Tile::new(row, col, terrain));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Разбирает текст шаблона; `source` нужен только для сообщений об ошибках
    pub fn parse(text: &str, source: &Path) -> error::Result<Self> {
        let mut rows = Vec::new();
        for (row, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                break;
            }
            let mut cells = Vec::new();
            for (col, glyph) in line.chars().enumerate() {
                let terrain = Terrain::from_glyph(glyph).ok_or_else(|| {
                    GenError::data(
                        source,
                        format!("unknown terrain glyph {glyph:?} at row {row}, column {col}"),
                    )
                })?;
                cells.push(terrain);
            }
            rows.push(cells);
        }
        if rows.is_empty() {
            return Err(GenError::data(source, "template has no rows"));
        }
        Ok(Self::from_rows(&rows))
    }

    /// Читает шаблон с диска
    pub fn load(path: &Path) -> error::Result<Self> {
        let text = error::read_to_string(path)?;
        Self::parse(&text, path)
    }

    #[must_use]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[must_use]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    #[must_use]
    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.in_bounds(row, col)
            .then(|| &self.tiles[self.index(row, col)])
    }

    /// Местность по знаковым координатам; вне сетки — [`Terrain::Void`]
    #[must_use]
    pub fn terrain_at(&self, row: isize, col: isize) -> Terrain {
        if row < 0 || col < 0 {
            return Terrain::Void;
        }
        self.tile(row as usize, col as usize)
            .map_or(Terrain::Void, |t| t.terrain)
    }

    /// Индексы соседей внутри сетки в порядке [`DIRECTIONS`]
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let row = (idx / self.width) as isize;
        let col = (idx % self.width) as isize;
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let (nr, nc) = (row + dr, col + dc);
            (nr >= 0 && nc >= 0 && (nr as usize) < self.height && (nc as usize) < self.width)
                .then(|| nr as usize * self.width + nc as usize)
        })
    }

    #[must_use]
    pub fn is_border(&self, idx: usize) -> bool {
        let (row, col) = (idx / self.width, idx % self.width);
        row == 0 || col == 0 || row + 1 == self.height || col + 1 == self.width
    }

    /// Связно ли множество клеток по 4 соседям (пустое считается связным)
    #[must_use]
    pub fn is_connected(&self, members: &BTreeSet<usize>) -> bool {
        let Some(&start) = members.first() else {
            return true;
        };
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for n in self.neighbors(idx) {
                if members.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == members.len()
    }

    /// Клетки каждой провинции по id
    #[must_use]
    pub fn region_members(&self) -> BTreeMap<u32, BTreeSet<usize>> {
        let mut members: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();
        for (idx, tile) in self.tiles.iter().enumerate() {
            if let Some(id) = tile.region {
                members.entry(id).or_default().insert(idx);
            }
        }
        members
    }

    /// Отметки глубины: BFS от всей суши по воде, с потолком [`MAX_DEPTH`]
    pub fn compute_depths(&mut self) {
        let mut queue = VecDeque::new();
        for (idx, tile) in self.tiles.iter_mut().enumerate() {
            tile.depth = None;
            if tile.terrain.is_land() {
                tile.depth = Some(0);
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            let depth = self.tiles[idx].depth.unwrap_or(0);
            let next: Vec<usize> = self.neighbors(idx).collect();
            for nidx in next {
                let tile = &mut self.tiles[nidx];
                if tile.depth.is_none() && tile.terrain.is_sea() {
                    tile.depth = Some((depth + 1).min(MAX_DEPTH));
                    queue.push_back(nidx);
                }
            }
        }

        // Вода без суши вообще — максимальная глубина
        for tile in &mut self.tiles {
            if tile.depth.is_none() && tile.terrain.is_sea() {
                tile.depth = Some(MAX_DEPTH);
            }
        }
    }

    /// Строки символов местности (первая часть текстового дампа)
    #[must_use]
    pub fn glyph_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|t| t.terrain.glyph()).collect())
            .collect()
    }
}
