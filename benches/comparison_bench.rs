use criterion::{criterion_group, criterion_main, Criterion};
use grid_lpastar::{costs, AstarPlanner, Costmap, GridPlanner, LpaStar, Point};
use grid_lpastar_benchmark::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

const BENCH_SET: [&str; 2] = ["demo/rooms", "demo/scattered"];
const N_EDITS: usize = 16;

fn load_costmap(name: &str) -> (Costmap, Vec<BenchmarkScenario>) {
    let (map, scenarios) = get_benchmark(name.to_owned());
    let costmap = Costmap::new(map.width, map.height, 1.0, map.costs)
        .expect("Benchmark map does not match its dimensions");
    (costmap, scenarios)
}

/// Free cells on the path of the longest scenario, away from its endpoints.
fn edit_cells(costmap: &Costmap, start: Point, end: Point, rng: &mut StdRng) -> Vec<Point> {
    let path = AstarPlanner::default()
        .get_path(costmap, start, end)
        .expect("Benchmark scenario has no path");
    (0..N_EDITS)
        .map(|_| path[rng.gen_range(1..path.len() - 1)])
        .collect()
}

fn bench_from_scratch<P: GridPlanner>(c: &mut Criterion, planner_name: &str, mut planner: P) {
    for name in BENCH_SET {
        let (costmap, scenarios) = load_costmap(name);
        c.bench_function(format!("{name}, {planner_name} from scratch").as_str(), |b| {
            b.iter(|| {
                for (start, end, _) in &scenarios {
                    black_box(planner.plan(&costmap, *start, *end));
                }
            })
        });
    }
}

fn bench_replanning<P: GridPlanner>(c: &mut Criterion, planner_name: &str, mut planner: P) {
    let mut rng = StdRng::seed_from_u64(0);
    for name in BENCH_SET {
        let (mut costmap, scenarios) = load_costmap(name);
        let (start, end, _) = scenarios[scenarios.len() - 1];
        let cells = edit_cells(&costmap, start, end, &mut rng);
        planner.plan(&costmap, start, end);
        c.bench_function(format!("{name}, {planner_name} replanning").as_str(), |b| {
            b.iter(|| {
                for cell in &cells {
                    costmap.set(*cell, costs::LETHAL);
                    black_box(planner.plan(&costmap, start, end));
                    costmap.set(*cell, costs::FREE);
                    black_box(planner.plan(&costmap, start, end));
                }
            })
        });
    }
}

fn lpa_star_bench(c: &mut Criterion) {
    bench_from_scratch(c, "LPA*", LpaStar::default());
    bench_replanning(c, "LPA*", LpaStar::default());
}

fn astar_bench(c: &mut Criterion) {
    bench_from_scratch(c, "Astar", AstarPlanner::default());
    bench_replanning(c, "Astar", AstarPlanner::default());
}

criterion_group!(benches, lpa_star_bench, astar_bench);
criterion_main!(benches);
