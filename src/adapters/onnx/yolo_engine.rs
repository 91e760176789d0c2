use anyhow::{anyhow, Result};
use image::RgbImage;
use ndarray::{ArrayViewD, Axis, Ix2, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Value;
use std::fs;

use crate::adapters::onnx::{
    labels::parse_names_metadata,
    postprocess::decode_output,
    preprocess::{letterbox, to_nchw},
};
use crate::domain::detection::Detection;
use crate::domain::labels::LabelTable;
use crate::domain::model::YoloParams;

pub struct OnnxYoloEngine {
    session: Session,
}

impl OnnxYoloEngine {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = Session::builder()?.with_intra_threads(4)?;

        // CUDA es opcional: si está disponible se registra, si no continuamos en CPU.
        let cuda = CUDAExecutionProvider::default().build();
        if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
            builder = builder_with_cuda;
        }

        let model_bytes = fs::read(path)?;
        let session = builder.commit_from_memory(&model_bytes)?;

        Ok(Self { session })
    }

    /// Nombres de clase embebidos por el exportador (`names` en los metadatos).
    pub fn embedded_labels(&self) -> Option<LabelTable> {
        let metadata = self.session.metadata().ok()?;
        let raw = metadata.custom("names").ok().flatten()?;
        parse_names_metadata(&raw)
    }

    pub fn infer(
        &mut self,
        rgb: &RgbImage,
        params: &YoloParams,
        labels: &LabelTable,
    ) -> Result<Vec<Detection>> {
        let imgsz = params.input_size as usize;
        if imgsz == 0 {
            return Err(anyhow!("input_size debe ser mayor que 0"));
        }
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(anyhow!("imagen vacía: {}x{}", rgb.width(), rgb.height()));
        }

        // Misma entrada que en el entrenamiento: proporción conservada y relleno gris.
        let (boxed, geometry) = letterbox(rgb, params.input_size);
        let input = to_nchw(&boxed);

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let input_tensor = Value::from_array((input_shape, input.into_raw_vec_and_offset().0))?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x as usize).collect();
        if dims.len() != 3 {
            return Err(anyhow!("Se esperaba salida 3D, se obtuvo {}D", dims.len()));
        }
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;

        decode_output(view, labels, params, &geometry)
    }
}
