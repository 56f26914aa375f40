//! Data types for evidence input and the synthesized results document.

pub mod core;
pub mod fonts;
pub mod results;
pub mod sample;

pub use self::core::{BoundingBox, CandidateGroup, ComponentType, StateName, StyleMap};
pub use fonts::{FontFace, FontProbe, FontRequest, NetworkEntry};
pub use results::*;
pub use sample::{Candidate, CandidateObservation, Sample, StateCapture, StateDiff};
