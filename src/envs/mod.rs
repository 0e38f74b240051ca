pub mod grid_world;
#[cfg(test)]
pub mod simple_golf;
pub mod simulator;
