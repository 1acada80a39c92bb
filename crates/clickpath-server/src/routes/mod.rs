pub mod adjacency;
pub mod dataset;
pub mod dropoff;
pub mod export;
pub mod health;
pub mod metrics;
pub mod overview;
pub mod params;
pub mod paths;
pub mod segments;
