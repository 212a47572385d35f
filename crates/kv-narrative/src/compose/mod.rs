//! Text composition: layering, state-driven distortion, fractures, highlighting.

mod composer;
mod distort;
mod fracture;
mod highlight;
mod layers;

pub use composer::{ComposedLine, ComposedText, TextComposer};
pub use distort::{Distortion, doubt_filter, sanity_glitch, stress_distort};
pub use fracture::{
    FORCE_FLAG, FractureHistory, FractureKind, FractureRecord, apply_fracture, fracture_gate,
};
pub use highlight::Highlighter;
pub use layers::{InsertPosition, Lens, SceneText, TextInsert};
