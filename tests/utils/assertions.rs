//! Test assertion helpers - fluent API for verifying grid responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct GridAssertion<'a> {
    grid: &'a Value,
}

impl<'a> GridAssertion<'a> {
    pub fn new(grid: &'a Value) -> Self {
        Self { grid }
    }

    fn entries(&self) -> &'a Vec<Value> {
        self.grid["entries"].as_array().expect("grid has entries")
    }

    /// Assert the number of grid positions
    pub fn has_entries(self, expected: usize) -> Self {
        assert_eq!(self.entries().len(), expected, "grid: {}", self.grid);
        self
    }

    /// Assert the card names in grid order, `None` for empty slots
    pub fn names_in_order(self, expected: &[Option<&str>]) -> Self {
        let actual: Vec<Option<&str>> = self
            .entries()
            .iter()
            .map(|entry| entry["card"]["name"].as_str())
            .collect();
        assert_eq!(actual, expected, "grid: {}", self.grid);
        self
    }

    /// Assert a placeholder with its expected bucket at a 1-based position
    pub fn empty_slot_at(self, position: u64, bucket: &str) -> Self {
        let entry = self
            .entries()
            .iter()
            .find(|entry| entry["position"] == position)
            .unwrap_or_else(|| panic!("no entry at position {}", position));
        assert_eq!(entry["kind"], "empty", "entry: {}", entry);
        assert_eq!(entry["expected_bucket"], bucket, "entry: {}", entry);
        self
    }

    /// Assert the overflow cards as (name, position) pairs
    pub fn overflow_is(self, expected: &[(&str, u64)]) -> Self {
        let actual: Vec<(&str, u64)> = self.grid["overflow"]
            .as_array()
            .expect("grid has overflow")
            .iter()
            .map(|entry| {
                (
                    entry["card"]["name"].as_str().unwrap_or_default(),
                    entry["position"].as_u64().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(actual, expected, "grid: {}", self.grid);
        self
    }
}
