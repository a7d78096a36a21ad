//! Сквозные тесты генерации: файлы на входе, файлы на выходе.

use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use worldgraph::config::GenerationPaths;
use worldgraph::province::authored::RegionSeed;
use worldgraph::road;
use worldgraph::{
    DEFAULT_SEED, GenError, GenerationParams, GenerationSession, Grid, PathSettings, Sfc32, World,
    WorldInputs,
};

const OUTPUTS: [&str; 6] = [
    "continents.json",
    "gates.json",
    "locations.json",
    "roads.json",
    "seed.json",
    "map-dump.txt",
];

fn settings(lib: &Path) -> PathSettings {
    PathSettings {
        lib_dir: Some(lib.to_path_buf()),
        map: Some("world.map".into()),
        city: Some("cities.toml".into()),
        land: Some("land.toml".into()),
        region: Some("regions.toml".into()),
        continent: Some("continents.json".into()),
        gate: Some("gates.json".into()),
        location: Some("locations.json".into()),
        road: Some("roads.json".into()),
        seed: Some("seed.json".into()),
        dump: None,
    }
}

fn write_library(lib: &Path, map: &str, land: &str, regions: &str, cities: &str) -> GenerationPaths {
    fs::write(lib.join("world.map"), map).unwrap();
    fs::write(lib.join("land.toml"), land).unwrap();
    fs::write(lib.join("regions.toml"), regions).unwrap();
    fs::write(lib.join("cities.toml"), cities).unwrap();
    settings(lib).resolve().unwrap()
}

fn read_outputs(lib: &Path) -> BTreeMap<&'static str, Vec<u8>> {
    OUTPUTS
        .iter()
        .map(|&name| (name, fs::read(lib.join(name)).unwrap()))
        .collect()
}

fn assert_regions_cover_land(world: &World) {
    let grid = &world.grid;
    for tile in &grid.tiles {
        assert_eq!(
            tile.terrain.is_land(),
            tile.region.is_some(),
            "tile ({}, {})",
            tile.row,
            tile.col
        );
    }
    let members = grid.region_members();
    let ids: BTreeSet<u32> = world.provinces.iter().map(|p| p.id).collect();
    assert_eq!(ids, members.keys().copied().collect());
    for (id, tiles) in members {
        assert!(grid.is_connected(&tiles), "province {id} is not 4-connected");
    }
}

fn assert_roads_connected(world: &World) {
    let mut pairs = BTreeSet::new();
    for road in &world.roads {
        assert_ne!(road.from, road.to);
        assert!(pairs.insert((road.from.min(road.to), road.from.max(road.to))));
    }
    assert!(road::connects_all(&world.provinces, &world.roads));
}

fn assert_gates_valid(world: &World) {
    let mut pairs = BTreeSet::new();
    for gate in &world.gates {
        assert_ne!(gate.origin_province, gate.destination_province);
        assert!(pairs.insert((gate.origin_province, gate.destination_province)));
    }
}

#[test]
fn all_land_ten_by_ten_without_gates() {
    let dir = tempfile::tempdir().unwrap();
    let map = "..........\n".repeat(10);
    let paths = write_library(dir.path(), &map, "[gates]\ncount = 0\n", "", "");

    let world = worldgraph::run(&paths).unwrap();
    // эталон для сида по умолчанию: 10 кластеров и 7 островов из остатков
    assert_eq!(world.provinces.len(), 17);
    assert_eq!(world.continents.len(), 1);
    assert!(world.gates.is_empty());
    assert_regions_cover_land(&world);
    assert_roads_connected(&world);

    let first_row: Vec<Option<u32>> = world.grid.tiles[..10].iter().map(|t| t.region).collect();
    let expected = [1, 2, 2, 2, 3, 3, 3, 4, 4, 4].map(Some);
    assert_eq!(first_row, expected);
    let islands = world
        .provinces
        .iter()
        .filter(|p| p.name.starts_with("Island_"))
        .count();
    assert_eq!(islands, 7);
}

#[test]
fn identical_inputs_give_byte_identical_outputs() {
    let map = "~~~~~~~~~~~~\n~..%%^^..~.~\n~.%%^^nn:.~~\n~..&&..::~.~\n~~~~~~~~~~~~\n";
    let land = "[clump]\nmin_size = 2\nmax_size = 6\n[gates]\ncount = 3\n[sublocs]\ndensity = 80\n";
    let regions = "[[region]]\nid = 3\nname = \"Marsh\"\ntiles = [[3, 3], [3, 4]]\n";
    let cities = "[[city]]\nname = \"Harbor\"\nrow = 1\ncol = 1\n";
    let seed = r#"{"state":{"a":1,"b":2,"c":3,"d":4}}"#;

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_library(dir.path(), map, land, regions, cities);
        fs::write(&paths.seed, seed).unwrap();
        let world = worldgraph::run(&paths).unwrap();
        assert_regions_cover_land(&world);
        assert_roads_connected(&world);
        assert_gates_valid(&world);
        assert!(world.provinces.iter().any(|p| p.id == 3 && p.name == "Marsh"));
        outputs.push(read_outputs(dir.path()));
    }
    assert_eq!(outputs[0], outputs[1]);
    assert_ne!(outputs[0]["seed.json"], seed.as_bytes());
}

#[test]
fn saved_seed_drives_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let map = "........\n".repeat(6);
    let paths = write_library(dir.path(), &map, "", "", "");

    worldgraph::run(&paths).unwrap();
    let first = read_outputs(dir.path());
    worldgraph::run(&paths).unwrap();
    let second = read_outputs(dir.path());
    // второй прогон стартует с сохранённого состояния
    assert_ne!(first["seed.json"], second["seed.json"]);
}

#[test]
fn missing_path_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut partial = settings(dir.path());
    partial.road = None;
    let err = partial.resolve().unwrap_err();
    assert!(matches!(err, GenError::Config { .. }));
    assert!(err.to_string().contains("road"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unreadable_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_library(dir.path(), "....\n", "", "", "");
    fs::remove_file(&paths.region).unwrap();
    let err = worldgraph::run(&paths).unwrap_err();
    assert!(matches!(err, GenError::Io { .. }));
    assert!(!paths.location.exists());
}

#[test]
fn malformed_land_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_library(dir.path(), "....\n", "[clump]\nmin_size = 0\n", "", "");
    let err = worldgraph::run(&paths).unwrap_err();
    assert!(matches!(err, GenError::Data { .. }));
}

#[test]
fn exported_records_are_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let map = "~~~~~~\n~..~.~\n~..~~~\n~~~~~~\n";
    let paths = write_library(dir.path(), map, "[clump]\nmin_size = 1\nmax_size = 4\n", "", "");
    let world = worldgraph::run(&paths).unwrap();

    let locations: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.location).unwrap()).unwrap();
    let records = locations.as_array().unwrap();
    assert_eq!(records.len(), world.provinces.len());
    assert!(records[0].get("sublocs").is_some());
    assert!(records[0].get("type").is_some());

    let roads: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.road).unwrap()).unwrap();
    assert_eq!(roads.as_array().unwrap().len(), world.roads.len());

    let dump = fs::read_to_string(&paths.dump).unwrap();
    let reloaded = Grid::parse(&dump, &paths.dump).unwrap();
    assert_eq!(reloaded.glyph_rows(), world.grid.glyph_rows());
}

#[test]
fn random_templates_keep_every_invariant() {
    let palette = ['~', '~', '~', '.', '.', '%', '^', 'n', ':', '&', '≈'];
    let mut sampler = rand_chacha::ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..30 {
        let height = sampler.gen_range(1..16);
        let text: String = (0..height)
            .map(|_| {
                let width = sampler.gen_range(1..20);
                let mut row: String = (0..width)
                    .map(|_| palette[sampler.gen_range(0..palette.len())])
                    .collect();
                row.push('\n');
                row
            })
            .collect();
        let grid = Grid::parse(&text, Path::new("random.map")).unwrap();
        let mut params = GenerationParams::default();
        params.clump.min_size = sampler.gen_range(1..4);
        params.clump.max_size = params.clump.min_size + sampler.gen_range(0..8);
        params.gates.count = sampler.gen_range(0..6);
        params.gates.bidirectional = sampler.gen_bool(0.5);
        params.continents.sea_lane_reach = sampler.gen_range(0..3);

        let mut session = GenerationSession::new(Sfc32::new(DEFAULT_SEED));
        let world = session
            .generate(WorldInputs::from_grid(grid, params))
            .unwrap();
        assert_regions_cover_land(&world);
        assert_roads_connected(&world);
        assert_gates_valid(&world);
        let continent_members: usize = world.continents.iter().map(|c| c.province_ids.len()).sum();
        assert_eq!(continent_members, world.provinces.len());
    }
}

#[test]
fn sea_depth_is_exported_in_the_dump() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_library(dir.path(), "~~~~\n~..~\n~~~~\n", "", "", "");
    worldgraph::run(&paths).unwrap();

    let dump = fs::read_to_string(&paths.dump).unwrap();
    let blocks: Vec<&str> = dump.split("\n\n").collect();
    assert_eq!(blocks.len(), 3, "{dump}");
    assert_eq!(blocks[2], "2112\n1001\n2112\n");
}

#[test]
fn tile_features_are_exported_with_locations() {
    let dir = tempfile::tempdir().unwrap();
    let map = "~~~~~~~\n~.~.~.~\n~~~~~~~\n~.~.~.~\n~~~~~~~\n";
    let paths = write_library(dir.path(), map, "[gates]\ncount = 3\n", "", "");
    let world = worldgraph::run(&paths).unwrap();
    assert!(!world.roads.is_empty());

    let locations: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.location).unwrap()).unwrap();
    let mut exported_roads = BTreeSet::new();
    for record in locations.as_array().unwrap() {
        for feature in record["features"].as_array().unwrap() {
            assert!(feature.get("continent").is_some());
            for id in feature["roads"].as_array().unwrap() {
                exported_roads.insert(id.as_u64().unwrap() as u32);
            }
        }
    }
    let roads: BTreeSet<u32> = world.roads.iter().map(|r| r.id).collect();
    assert_eq!(exported_roads, roads);
}

#[test]
fn authored_id_at_the_top_of_the_range_is_rejected() {
    let grid = Grid::parse("..~..\n", Path::new("t.map")).unwrap();
    let mut params = GenerationParams::default();
    params.normalize.enabled = false;
    let mut inputs = WorldInputs::from_grid(grid.clone(), params.clone());
    inputs.regions = vec![RegionSeed {
        id: u32::MAX,
        name: "Edge".into(),
        tiles: vec![[0, 0], [0, 1]],
    }];
    let mut session = GenerationSession::new(Sfc32::new(DEFAULT_SEED));
    let err = session.generate(inputs).unwrap_err();
    assert!(matches!(err, GenError::Data { .. }));

    // четыре клетки суши: самый старший id, после которого ещё хватает места
    let mut inputs = WorldInputs::from_grid(grid, params);
    inputs.regions = vec![RegionSeed {
        id: u32::MAX - 4,
        name: "Edge".into(),
        tiles: vec![[0, 0], [0, 1]],
    }];
    let world = session.generate(inputs).unwrap();
    let ids: Vec<u32> = world.provinces.iter().map(|p| p.id).collect();
    assert_eq!(ids, [u32::MAX - 4, u32::MAX - 3]);
}
