pub mod checkpoint;
pub mod engine;
pub mod locks;
pub mod resolution;
pub mod runner;
pub mod state;
pub mod status_effects;

#[cfg(test)]
mod tests;
