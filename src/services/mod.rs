pub mod outcome_tally;
pub mod trainer;
pub mod training_set;

pub use outcome_tally::tally_outcomes;
pub use trainer::Trainer;
pub use training_set::{ActionSamples, TrainingSet};
