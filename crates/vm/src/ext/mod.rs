/// Utilities for working with function selectors
pub mod selectors;
