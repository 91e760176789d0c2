pub mod cli;
pub mod http;
pub mod onnx;
pub mod predict;
pub mod render;
