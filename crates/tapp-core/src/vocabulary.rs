//! Known enumerated values for the program and department categories.
//!
//! Values outside these lists fall into the `other` bucket when filtering,
//! and unknown programs sort after every known one.

use serde::{Deserialize, Serialize};

/// Filter bucket for values not in the known list.
pub const OTHER: &str = "other";

/// Filter bucket for absent or blank values.
pub const EMPTY: &str = "";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
  /// Known programs, in sort priority order (lowest rank first).
  #[serde(default = "default_programs")]
  pub known_programs:    Vec<String>,
  #[serde(default = "default_departments")]
  pub known_departments: Vec<String>,
}

impl Default for Vocabulary {
  fn default() -> Self {
    Self {
      known_programs:    default_programs(),
      known_departments: default_departments(),
    }
  }
}

fn default_programs() -> Vec<String> {
  ["U", "PD", "MScAC", "M", "P"].map(String::from).to_vec()
}

fn default_departments() -> Vec<String> {
  ["cs", "ece", "math", "stats"].map(String::from).to_vec()
}

impl Vocabulary {
  /// Sort rank of a known program.
  pub fn program_rank(&self, program: &str) -> Option<usize> {
    self.known_programs.iter().position(|p| p == program)
  }

  pub fn is_known_program(&self, program: &str) -> bool {
    self.program_rank(program).is_some()
  }

  pub fn is_known_department(&self, department: &str) -> bool {
    self.known_departments.iter().any(|d| d == department)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_priority_order() {
    let v = Vocabulary::default();
    assert_eq!(v.program_rank("U"), Some(0));
    assert_eq!(v.program_rank("P"), Some(4));
    assert_eq!(v.program_rank("zzz"), None);
  }

  #[test]
  fn partial_config_keeps_other_defaults() {
    let v: Vocabulary =
      serde_json::from_str(r#"{"known_departments":["physics"]}"#).unwrap();
    assert_eq!(v.known_programs, Vocabulary::default().known_programs);
    assert!(v.is_known_department("physics"));
    assert!(!v.is_known_department("cs"));
  }
}
