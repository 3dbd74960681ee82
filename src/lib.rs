// Topicboard: normalized views over precomputed topic-modeling results.
//
// This is the library root. `store` loads a dashboard bundle and answers
// queries, `bundle` assembles bundles from raw analysis folders, and
// `output` shapes query results for the terminal and for charts.

pub mod bundle;
pub mod config;
pub mod output;
pub mod store;
