use grid_lpastar::{costs, AstarPlanner, Costmap, GridPlanner, LpaStar, PlanResult, Point};

// A path is planned through an open room, after which a wall with a single gap appears across
// it. The incremental planner repairs its previous search and is compared with planning from
// scratch.
//  ______________
// |     #        |
// |S    #       G|
// |     #        |
//  --------------
fn print_plan(costmap: &Costmap, result: &PlanResult) {
    for y in (0..costmap.height() as i32).rev() {
        let row: String = (0..costmap.width() as i32)
            .map(|x| {
                let p = Point::new(x, y);
                if result.path.first() == Some(&p) {
                    'S'
                } else if result.path.last() == Some(&p) {
                    'G'
                } else if costmap.get(p) >= costs::INSCRIBED {
                    '#'
                } else if result.path.contains(&p) {
                    '*'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{}", row);
    }
}

fn main() {
    const W: usize = 32;
    const H: usize = 16;
    let mut costmap = Costmap::filled(W, H, costs::FREE);
    let start = Point::new(1, 8);
    let goal = Point::new(30, 8);
    let mut planner = LpaStar::default();

    let result = planner.plan(&costmap, start, goal);
    println!(
        "Initial plan: cost {:?}, {} expansions",
        result.cost, result.expansions
    );
    print_plan(&costmap, &result);

    costmap.set_rect(16, 0, 1, H as i32 - 3, costs::LETHAL);
    let result = planner.plan(&costmap, start, goal);
    println!(
        "\nAfter the wall appeared: cost {:?}, {} expansions",
        result.cost, result.expansions
    );
    print_plan(&costmap, &result);

    let reference = AstarPlanner::default().plan(&costmap, start, goal);
    println!(
        "\nA* from scratch: cost {:?}, {} expansions",
        reference.cost, reference.expansions
    );
}
