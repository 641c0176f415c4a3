//! Workflow and scope configuration.

use serde::{Deserialize, Serialize};

/// Scope resolution bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Maximum depth explored below a leader before traversal stops.
    #[serde(default = "default_max_depth")]
    pub max_tree_depth: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: default_max_depth(),
        }
    }
}

/// Course workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Number of lessons in the course; valid ids are `1..=course_count`.
    #[serde(default = "default_course_count")]
    pub course_count: i32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            course_count: default_course_count(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}

fn default_course_count() -> i32 {
    12
}
