// src/pipeline.rs
//! Сессия генерации и порядок этапов
//!
//! Сессия владеет генератором случайных чисел; все этапы получают его явно и
//! выполняются строго по очереди:
//! нормализация → ручные провинции → кластеризация → острова → сводки и континенты →
//! особые места → врата → дороги. Каждый этап видит полностью готовый результат предыдущего.

use crate::config::{GenerationParams, GenerationPaths};
use crate::continent::{Continent, assign_continents};
use crate::error;
use crate::export::export_world;
use crate::gate::{Gate, build_gates};
use crate::grid::Grid;
use crate::normalize::normalize_terrain;
use crate::province::authored::{RegionSeed, assign_regions, load_region_seeds, next_free_id};
use crate::province::clump::clump_provinces;
use crate::province::graph::build_province_graph;
use crate::province::island::build_islands;
use crate::province::{Province, build_provinces};
use crate::rng::{self, Sfc32};
use crate::road::{RoadEdge, build_roads};
use crate::subloc::{CitySeed, Subloc, load_city_seeds, place_authored_cities, place_sublocs};
use log::info;
use std::path::{Path, PathBuf};

/// Всё, что нужно для генерации, уже прочитанное с диска
#[derive(Debug, Clone)]
pub struct WorldInputs {
    pub grid: Grid,
    pub params: GenerationParams,
    pub regions: Vec<RegionSeed>,
    pub cities: Vec<CitySeed>,
    /// Пути источников — только для сообщений об ошибках
    pub region_source: PathBuf,
    pub city_source: PathBuf,
}

impl WorldInputs {
    pub fn load(paths: &GenerationPaths) -> error::Result<Self> {
        let grid = Grid::load(&paths.map)?;
        info!("Шаблон {}×{} загружен", grid.width, grid.height);
        Ok(Self {
            grid,
            params: GenerationParams::from_toml_file(&paths.land)?,
            regions: load_region_seeds(&paths.region)?,
            cities: load_city_seeds(&paths.city)?,
            region_source: paths.region.clone(),
            city_source: paths.city.clone(),
        })
    }

    /// Входные данные без файлов: без ручных провинций и городов
    #[must_use]
    pub fn from_grid(grid: Grid, params: GenerationParams) -> Self {
        Self {
            grid,
            params,
            regions: Vec::new(),
            cities: Vec::new(),
            region_source: PathBuf::new(),
            city_source: PathBuf::new(),
        }
    }
}

/// Готовый мир; после выгрузки не меняется
#[derive(Debug, Clone)]
pub struct World {
    pub grid: Grid,
    pub provinces: Vec<Province>,
    pub continents: Vec<Continent>,
    pub sublocs: Vec<Subloc>,
    pub gates: Vec<Gate>,
    pub roads: Vec<RoadEdge>,
}

#[derive(Debug, Clone)]
pub struct GenerationSession {
    rng: Sfc32,
}

impl GenerationSession {
    #[must_use]
    pub fn new(rng: Sfc32) -> Self {
        Self { rng }
    }

    /// Сессия с сидом из файла (или сидом по умолчанию)
    #[must_use]
    pub fn from_seed_file(path: &Path) -> Self {
        Self::new(rng::load_seed(path))
    }

    #[must_use]
    pub fn rng(&self) -> &Sfc32 {
        &self.rng
    }

    pub fn generate(&mut self, inputs: WorldInputs) -> error::Result<World> {
        let WorldInputs {
            mut grid,
            params,
            regions,
            cities,
            region_source,
            city_source,
        } = inputs;

        if params.normalize.enabled {
            normalize_terrain(&mut grid);
        }
        grid.compute_depths();

        let mut drafts = assign_regions(&mut grid, &regions, &region_source)?;
        drafts.extend(clump_provinces(
            &mut grid,
            &params.clump,
            next_free_id(&drafts),
            &mut self.rng,
        ));
        drafts.extend(build_islands(&mut grid, next_free_id(&drafts)));

        let mut provinces = build_provinces(&grid, &drafts);
        let adjacency = build_province_graph(&grid, &provinces);
        let continents =
            assign_continents(&mut grid, &mut provinces, &adjacency, &params.continents);

        let mut sublocs = place_authored_cities(&mut grid, &cities, &city_source)?;
        place_sublocs(
            &mut grid,
            &provinces,
            &params.sublocs,
            &mut sublocs,
            &mut self.rng,
        );

        let gates = build_gates(&mut grid, &provinces, &params.gates, &mut self.rng);
        let roads = build_roads(
            &mut grid,
            &provinces,
            &adjacency,
            &params.roads,
            &mut self.rng,
        );

        Ok(World {
            grid,
            provinces,
            continents,
            sublocs,
            gates,
            roads,
        })
    }
}

/// Полный прогон: загрузка, генерация, выгрузка, сохранение сида
pub fn run(paths: &GenerationPaths) -> error::Result<World> {
    let inputs = WorldInputs::load(paths)?;
    let mut session = GenerationSession::from_seed_file(&paths.seed);
    let world = session.generate(inputs)?;
    export_world(&world, paths)?;
    rng::save_seed(&paths.seed, session.rng())?;
    info!("Сид сохранён в {}", paths.seed.display());
    Ok(world)
}
