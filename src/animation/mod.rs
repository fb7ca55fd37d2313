pub mod ease;
pub mod keyframe;
pub mod motion;
