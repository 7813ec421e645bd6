pub mod chain;
pub mod evolve;
pub mod model;
pub mod providers;
pub mod storage;

pub use chain::{ChainState, Evolution, EvolutionChain, EvolveError, SeedStatus};
pub use model::{GenerationOutcome, ImageRecord};
pub use storage::Store;
