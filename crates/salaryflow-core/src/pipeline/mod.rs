// The per-year aggregation stages, in the order the engine runs them:
// join, score thresholds, classify, aggregate, build.

pub mod aggregate;
pub mod classify;
pub mod directory;
pub mod graph;
pub mod join;
pub mod scoring;
pub mod team_record;
pub mod years;
