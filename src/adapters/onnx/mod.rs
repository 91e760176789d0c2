pub mod detector;
pub mod labels;
pub mod model_catalog;
pub mod postprocess;
pub mod preprocess;
pub mod yolo_engine;
