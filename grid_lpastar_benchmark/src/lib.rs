use csv::ReaderBuilder;
use grid_util::point::Point;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufRead};
use std::path::Path;
use walkdir::WalkDir;

/// Raw cost of traversable tiles.
pub const FREE: u8 = 0;
/// Raw cost of obstacle tiles.
pub const LETHAL: u8 = 254;

#[allow(unused)]
#[derive(Debug, Deserialize)]
pub struct Scenario {
    id: u32,
    file_name: String,
    w: u32,
    h: u32,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    distance: f64,
}

/// A benchmark map as row-major raw costs.
#[derive(Clone, Debug)]
pub struct BenchmarkMap {
    pub width: usize,
    pub height: usize,
    pub costs: Vec<u8>,
}

/// Start, goal and the optimal octile distance with diagonals of length sqrt(2).
pub type BenchmarkScenario = (Point, Point, f64);

fn tile_cost(tile: u8) -> u8 {
    if [b'.', b'G', b'S'].contains(&tile) {
        FREE
    } else {
        LETHAL
    }
}

fn load_benchmark(name: &str) -> (BenchmarkMap, Vec<BenchmarkScenario>) {
    let map_str = fs::read_to_string(Path::new(&format!("./maps/{}.map", name)))
        .expect("Could not read map file");

    let file = File::open(Path::new(&format!("./scenarios/{}.map.scen", name)))
        .expect("Could not open scenario file");

    // Skip the version line
    let reader = io::BufReader::new(file);
    let mut lines = reader.lines();
    lines.next();

    let remaining_data = lines
        .collect::<Result<Vec<_>, _>>()
        .expect("Could not read scenario lines")
        .join("\n");

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(remaining_data.as_bytes());
    let mut scenarios: Vec<BenchmarkScenario> = Vec::new();
    for result in csv_reader.deserialize() {
        let record: Scenario = result.expect("Could not parse scenario record");
        let start = Point::new(record.x1 as i32, record.y1 as i32);
        let goal = Point::new(record.x2 as i32, record.y2 as i32);
        scenarios.push((start, goal, record.distance));
    }

    let lines: Vec<&str> = map_str.lines().collect();
    let parse_line = |line: &str| -> usize {
        line.split_once(' ')
            .expect("Malformed map header")
            .1
            .parse::<usize>()
            .expect("Could not parse value")
    };

    let height = parse_line(lines[1]);
    let width = parse_line(lines[2]);

    let offset = 4;
    let mut costs = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = lines[offset + y].as_bytes();
        costs.extend((0..width).map(|x| tile_cost(row[x])));
    }
    (
        BenchmarkMap {
            width,
            height,
            costs,
        },
        scenarios,
    )
}

pub fn get_benchmark_names() -> Vec<String> {
    let root = Path::new("maps/");
    let root = root
        .canonicalize()
        .expect("Failed to canonicalize root path");
    let mut names = Vec::new();
    for entry in WalkDir::new(&root).into_iter() {
        let entry = entry.expect("Could not get dir entry");
        let rel_path = entry
            .path()
            .strip_prefix(&root)
            .expect("Entry outside of map root");
        if rel_path.components().count() >= 2 {
            if let Some((name, _)) = rel_path.to_str().and_then(|s| s.split_once('.')) {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    names
}

pub fn get_benchmark(name: String) -> (BenchmarkMap, Vec<BenchmarkScenario>) {
    let benchmark_names = get_benchmark_names();
    if benchmark_names.contains(&name) {
        load_benchmark(name.as_str())
    } else {
        panic!("Could not load benchmark {}!", name);
    }
}
