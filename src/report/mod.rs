//! Report generation

pub mod generator;

use crate::models::BatchOutcome;

pub fn generate_report(outcome: &BatchOutcome) -> String {
    generator::generate_markdown_report(outcome)
}
