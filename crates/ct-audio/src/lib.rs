//! Audio output backends for the chiptrack synthesizer.

mod cpal_backend;
mod traits;

pub use cpal_backend::CpalOutput;
pub use traits::{AudioError, AudioOutput};
