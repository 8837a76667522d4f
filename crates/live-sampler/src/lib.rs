//! Live Sampler for Real-Time Fatigue Monitoring
//!
//! Produces one metric sample per interval, classifies it, and feeds the
//! two live chart windows. Subscribers are notified of every reading.

mod observer;
mod sampler;
mod source;

pub use observer::SamplerObserver;
pub use sampler::{
    format_local_label, LiveReading, LiveSampler, LiveSnapshot, SamplerConfig, SamplerPhase,
};
pub use source::{RandomSampleSource, SampleSource};
