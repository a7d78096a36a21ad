// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет параметры, управляющие генерацией графа мира:
//! - Размеры кластеров провинций
//! - Плотность и разнесение особых мест
//! - Количество и степень врат
//! - Дорожную сеть и морские пути между континентами
//! - Набор путей к входным и выходным файлам
//!
//! Параметры читаются из TOML-файла кластеров суши; каждое поле имеет значение по умолчанию,
//! так что пустой файл — корректная конфигурация.

use crate::error::{self, GenError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Настройки кластеризации провинций
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClumpSettings {
    /// Минимальный размер провинции в клетках.
    /// Кластер, которому не хватило свободной суши, уходит в острова.
    #[serde(default = "default_min_size")]
    pub min_size: u32,

    /// Максимальный размер провинции в клетках.
    /// Целевой размер каждого кластера тянется из `[min_size, max_size]`.
    #[serde(default = "default_max_size")]
    pub max_size: u32,
}

fn default_min_size() -> u32 {
    4
}
fn default_max_size() -> u32 {
    12
}

impl Default for ClumpSettings {
    fn default() -> Self {
        Self {
            min_size: 4,
            max_size: 12,
        }
    }
}

/// Исправление шума береговой линии
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizeSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Настройки особых мест (города, кладбища и т.д.)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SublocSettings {
    /// Максимум особых мест в одной провинции (авторские города учитываются)
    #[serde(default = "default_max_per_province")]
    pub max_per_province: u32,

    /// Минимальное манхэттенское расстояние между любыми двумя особыми местами
    #[serde(default = "default_min_spacing")]
    pub min_spacing: u32,

    /// Шанс (в процентах) каждой попытки размещения
    #[serde(default = "default_subloc_density")]
    pub density: u32,
}

fn default_max_per_province() -> u32 {
    2
}
fn default_min_spacing() -> u32 {
    2
}
fn default_subloc_density() -> u32 {
    35
}

impl Default for SublocSettings {
    fn default() -> Self {
        Self {
            max_per_province: 2,
            min_spacing: 2,
            density: 35,
        }
    }
}

/// Настройки врат
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateSettings {
    /// Сколько врат пытаться создать (0 = без врат)
    #[serde(default = "default_gate_count")]
    pub count: u32,

    /// Максимум исходящих врат у одной провинции
    #[serde(default = "default_max_out_degree")]
    pub max_out_degree: u32,

    /// Двусторонние врата (учитываются в степени обеих провинций)
    #[serde(default)]
    pub bidirectional: bool,

    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_gate: u32,
}

fn default_gate_count() -> u32 {
    4
}
fn default_max_out_degree() -> u32 {
    1
}
fn default_max_attempts() -> u32 {
    32
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            count: 4,
            max_out_degree: 1,
            bidirectional: false,
            max_attempts_per_gate: 32,
        }
    }
}

/// Настройки дорожной сети
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadSettings {
    /// Шанс (в процентах) дороги между соседними провинциями.
    /// При 100 генератор не расходуется.
    #[serde(default = "default_adjacent_chance")]
    pub adjacent_chance: u32,

    /// Количество случайных дальних дорог
    #[serde(default = "default_long_links")]
    pub long_links: u32,

    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_link: u32,
}

fn default_adjacent_chance() -> u32 {
    100
}
fn default_long_links() -> u32 {
    2
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            adjacent_chance: 100,
            long_links: 2,
            max_attempts_per_link: 32,
        }
    }
}

/// Объединение провинций в континенты
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContinentSettings {
    /// Сколько клеток воды по прямой может пересечь морской путь:
    /// - `0` — только сухопутное соседство,
    /// - `n` — провинции через пролив шириной до `n` клеток считаются одним континентом.
    #[serde(default)]
    pub sea_lane_reach: u32,
}

/// Основные параметры генерации мира
///
/// Содержимое файла кластеров суши. Поддерживает загрузку из TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GenerationParams {
    #[serde(default)]
    pub clump: ClumpSettings,

    #[serde(default)]
    pub normalize: NormalizeSettings,

    #[serde(default)]
    pub sublocs: SublocSettings,

    #[serde(default)]
    pub gates: GateSettings,

    #[serde(default)]
    pub roads: RoadSettings,

    #[serde(default)]
    pub continents: ContinentSettings,
}

impl GenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # land.toml
    /// [clump]
    /// min_size = 3
    /// max_size = 8
    ///
    /// [gates]
    /// count = 0
    /// ```
    pub fn from_toml_file(path: &Path) -> error::Result<Self> {
        let contents = error::read_to_string(path)?;
        Self::from_toml_str(&contents, path)
    }

    pub fn from_toml_str(contents: &str, source: &Path) -> error::Result<Self> {
        let params: Self =
            toml::from_str(contents).map_err(|e| GenError::data(source, e.to_string()))?;
        params
            .validate()
            .map_err(|detail| GenError::data(source, detail))?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), String> {
        if self.clump.min_size == 0 {
            return Err("clump.min_size must be at least 1".into());
        }
        if self.clump.min_size > self.clump.max_size {
            return Err(format!(
                "clump.min_size ({}) exceeds clump.max_size ({})",
                self.clump.min_size, self.clump.max_size
            ));
        }
        if self.clump.max_size > i32::MAX as u32 {
            return Err("clump.max_size is too large".into());
        }
        for (name, value) in [
            ("sublocs.density", self.sublocs.density),
            ("roads.adjacent_chance", self.roads.adjacent_chance),
        ] {
            if value > 100 {
                return Err(format!("{name} is a percentage, got {value}"));
            }
        }
        Ok(())
    }
}

/// Набор путей для подкоманды генерации
///
/// Относительные пути разрешаются от каталога библиотеки (`lib_dir`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    pub lib_dir: Option<PathBuf>,
    pub map: Option<PathBuf>,
    pub city: Option<PathBuf>,
    pub land: Option<PathBuf>,
    pub region: Option<PathBuf>,
    pub continent: Option<PathBuf>,
    pub gate: Option<PathBuf>,
    pub location: Option<PathBuf>,
    pub road: Option<PathBuf>,
    pub seed: Option<PathBuf>,
    /// Текстовый дамп карты; необязателен, по умолчанию `map-dump.txt` в `lib_dir`
    pub dump: Option<PathBuf>,
}

/// Имя дампа карты по умолчанию
pub const DEFAULT_DUMP_NAME: &str = "map-dump.txt";

/// Проверенный набор путей: все обязательные заданы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPaths {
    pub map: PathBuf,
    pub city: PathBuf,
    pub land: PathBuf,
    pub region: PathBuf,
    pub continent: PathBuf,
    pub gate: PathBuf,
    pub location: PathBuf,
    pub road: PathBuf,
    pub seed: PathBuf,
    pub dump: PathBuf,
}

impl PathSettings {
    /// Проверяет, что все пути заданы, и разрешает их от `lib_dir`.
    ///
    /// Все отсутствующие имена перечисляются в одном сообщении.
    pub fn resolve(&self) -> error::Result<GenerationPaths> {
        let named = [
            ("lib", self.lib_dir.as_ref()),
            ("map", self.map.as_ref()),
            ("city", self.city.as_ref()),
            ("land", self.land.as_ref()),
            ("region", self.region.as_ref()),
            ("continent", self.continent.as_ref()),
            ("gate", self.gate.as_ref()),
            ("loc", self.location.as_ref()),
            ("road", self.road.as_ref()),
            ("seed", self.seed.as_ref()),
        ];
        let missing: Vec<&str> = named
            .iter()
            .filter(|(_, path)| path.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(GenError::config(format!(
                "missing required path(s): {}",
                missing.join(", ")
            )));
        }

        let lib = self.lib_dir.clone().unwrap_or_default();
        let join = |path: &Option<PathBuf>| lib.join(path.clone().unwrap_or_default());
        Ok(GenerationPaths {
            map: join(&self.map),
            city: join(&self.city),
            land: join(&self.land),
            region: join(&self.region),
            continent: join(&self.continent),
            gate: join(&self.gate),
            location: join(&self.location),
            road: join(&self.road),
            seed: join(&self.seed),
            dump: lib.join(
                self.dump
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_NAME)),
            ),
        })
    }
}
