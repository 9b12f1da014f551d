pub mod path_result;
pub mod search_stats;
pub mod shortest_path_engine;
