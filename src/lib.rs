pub mod config;
pub mod http_cache;
pub mod http_client;
pub mod match_events;
pub mod model;
pub mod normalize;
pub mod player_history;
pub mod player_stats;
pub mod repository;
pub mod sheets;
pub mod source;
pub mod standings;
pub mod team_record;
