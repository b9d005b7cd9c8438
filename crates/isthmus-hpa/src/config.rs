use isthmus_paths::Heuristic;

/// Tunables of the [`Planner`](crate::Planner).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Estimate used by every A* search.
    pub heuristic: Heuristic,
    /// Base cost of a horizontal or vertical step.
    pub cardinal_cost: f64,
    /// Base cost of a diagonal step.
    pub diagonal_cost: f64,
    /// Added when stepping onto a trap.
    pub trap_penalty: f64,
    /// Added when stepping onto a powerup (negative: a bonus).
    pub powerup_penalty: f64,
    /// Floor for a single step cost. Must be > 0 so searches terminate.
    pub min_step_cost: f64,
    /// Restrict each stitching search to the cells of the regions on that
    /// leg of the abstract plan, plus cut vertices.
    pub scope_segments: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Euclidean,
            cardinal_cost: 1.0,
            diagonal_cost: std::f64::consts::SQRT_2,
            trap_penalty: 3.0,
            powerup_penalty: -2.0,
            min_step_cost: 0.1,
            scope_segments: false,
        }
    }
}
