//! Running card requests end to end.
//!
//! [`driver::CardPipeline`] takes one request through every stage; [`batch::render_batch`]
//! fans many requests out over a rayon pool; [`sink::CardSink`] is where finished cards go.

pub mod batch;
pub mod driver;
pub mod sink;
