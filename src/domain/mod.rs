// Domain layer - Time codes, probe windows and keyframe sets

pub mod model;
