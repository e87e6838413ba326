// ═══════════════════════════════════════════════════════════════════════
// Planner configuration — gold thresholds for each phase
// Loaded from JSON by the runner; every field falls back to its default.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Build a mine only while `gold * mine_gold_ratio > mine_gold_floor`.
    pub mine_gold_ratio: f64,
    pub mine_gold_floor: i32,
    /// Build a tower only while gold exceeds this.
    pub tower_gold_floor: i32,
    /// Train or upgrade to rank N only while gold exceeds `train_floors[N - 1]`.
    pub train_floors: [i32; 3],
    /// Stop training fresh rank-1 units once this many exist.
    pub max_rank1_units: usize,
    /// Cells A* may settle before falling back to the greedy corridor.
    pub search_node_budget: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            mine_gold_ratio: 0.3,
            mine_gold_floor: 20,
            tower_gold_floor: 15,
            train_floors: [10, 21, 30],
            max_rank1_units: 3,
            search_node_budget: 1024,
        }
    }
}

impl PlannerConfig {
    pub fn train_floor(&self, rank: u8) -> i32 {
        self.train_floors[(rank.clamp(1, 3) - 1) as usize]
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
