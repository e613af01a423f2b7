pub mod consts;
pub mod error;

pub mod tuple;
pub mod ray;
pub mod geometry;
pub mod mesh;

pub mod shape;
pub mod intersect;
pub mod light;
pub mod texture;

pub mod world;
pub mod reflect;
pub mod camera;

pub mod color;
pub mod canvas;

pub mod obj;
pub mod scene;

use consts::FEQ_EPSILON;

/// Compares two floats with an absolute tolerance of `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
