pub mod vector;
pub mod states;
pub mod params;
pub mod engine;
pub mod orbit;
pub mod forces;
pub mod integrator;
pub mod system;
pub mod scheduler;
pub mod scenario;
