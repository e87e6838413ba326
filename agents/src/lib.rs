pub mod agent;
pub mod config;
pub mod greedy;
pub mod random;


pub use agent::{Agent, Budget};
pub use config::PlannerConfig;
pub use greedy::GreedyAgent;
pub use random::RandomAgent;
