use grid_lpastar::{costs, Costmap, GridPlanner, LpaStar, PlannerConfig, Point};

// A robot follows its plan one cell per tick while obstacles show up ahead of it. Only a scan
// window around the robot is inspected for changes. The session keeps its first start, so the
// robot uses get_state to find where it is on the returned path.
fn main() {
    const N: usize = 40;
    let mut costmap = Costmap::filled(N, N, costs::FREE);
    let goal = Point::new(N as i32 - 2, N as i32 - 2);
    let mut robot = Point::new(1, 1);
    let mut planner = LpaStar::new(PlannerConfig::default().with_scan_window(15));

    // Obstacles that appear on the given tick.
    let events = [
        (3, (10, 6, 1, 14)),
        (8, (14, 20, 14, 1)),
        (15, (24, 24, 1, 12)),
    ];

    for tick in 0..80 {
        for (_, (x, y, w, h)) in events.iter().filter(|(t, _)| *t == tick) {
            costmap.set_rect(*x, *y, *w, *h, costs::LETHAL);
            println!("Tick {}: obstacle at ({}, {}) of size {}x{}", tick, x, y, w, h);
        }
        let result = planner.plan(&costmap, robot, goal);
        if !result.found {
            println!("Tick {}: no path ({:?})", tick, result.failure);
            break;
        }
        if let Some(reason) = planner.last_reset() {
            println!("Tick {}: new session ({:?})", tick, reason);
        }
        let on_path = planner.get_state(robot);
        let ix = result
            .path
            .iter()
            .position(|p| *p == on_path)
            .unwrap_or(0);
        match result.path.get(ix + 1) {
            Some(next) => {
                println!(
                    "Tick {}: at {}, {} expansions, moving to {}",
                    tick, robot, result.expansions, next
                );
                robot = *next;
            }
            None => {
                println!("Tick {}: reached the goal at {}", tick, robot);
                break;
            }
        }
    }
}
