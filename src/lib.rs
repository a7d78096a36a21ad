pub mod config;
pub mod continent;
pub mod error;
pub mod export;
pub mod gate;
pub mod grid;
pub mod normalize;
pub mod pipeline;
pub mod province;
pub mod rng;
pub mod road;
pub mod subloc;
pub mod terrain;

pub use config::{GenerationParams, GenerationPaths, PathSettings};
pub use error::GenError;
pub use grid::{Grid, Tile};
pub use pipeline::{GenerationSession, World, WorldInputs, run};
pub use rng::{DEFAULT_SEED, RngState, Sfc32};
