//! Tax computations: GST portions and statutory interest

pub mod gst;
pub mod interest;

pub use gst::*;
pub use interest::*;
