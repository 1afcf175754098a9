use crate::costmap::costs;

/// Side length in cells of the local window scanned for cost changes when replanning with
/// [PlannerConfig::local_window] (3.5 m at 0.05 m per cell).
pub const LOCAL_WINDOW_SIZE: usize = 70;

/// Tunables shared by the planners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Cells with a raw cost at or above this value are impassable.
    pub lethal_cost: u8,
    /// Weight of the destination cell's raw cost in the cost of an edge. Unsigned, so edge costs
    /// never drop below the octile base cost the heuristic is built on.
    pub cost_weight: u32,
    /// If set, only an `n x n` window around the robot is diffed for cost changes and the
    /// session is reset once the robot drifts more than `n / 2` cells away from its path.
    /// Otherwise the whole grid is diffed and any change of start resets the session.
    pub scan_window: Option<usize>,
    /// Upper bound on expansions per planning call.
    pub max_expansions: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> PlannerConfig {
        PlannerConfig {
            lethal_cost: costs::INSCRIBED,
            cost_weight: 1,
            scan_window: None,
            max_expansions: None,
        }
    }
}

impl PlannerConfig {
    pub fn local_window() -> PlannerConfig {
        PlannerConfig::default().with_scan_window(LOCAL_WINDOW_SIZE)
    }

    pub fn with_lethal_cost(mut self, lethal_cost: u8) -> PlannerConfig {
        self.lethal_cost = lethal_cost;
        self
    }

    pub fn with_cost_weight(mut self, cost_weight: u32) -> PlannerConfig {
        self.cost_weight = cost_weight;
        self
    }

    pub fn with_scan_window(mut self, size: usize) -> PlannerConfig {
        self.scan_window = Some(size);
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> PlannerConfig {
        self.max_expansions = Some(limit);
        self
    }
}
