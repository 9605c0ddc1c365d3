//! Evaluator — §4.3. Static board value and transition reward under
//! caller-supplied weights.

pub mod features;
pub mod weights;

pub use features::{static_value, transition_reward};
pub use weights::Weights;
