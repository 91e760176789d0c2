use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::upload::DEFAULT_MAX_UPLOAD_BYTES;
use crate::domain::model::{InferenceConfig, ModelId, YoloParams};

#[derive(Debug, Parser)]
#[command(name = "cat-detect", version, about = "Detección de razas de gato con YOLO (ONNX)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lanza la API HTTP (`GET /`, `POST /detect`).
    Serve(ServeArgs),
    /// Predicción única sobre un archivo de imagen.
    Predict(PredictArgs),
}

/// Opciones comunes del modelo.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Pesos entrenados exportados a ONNX.
    #[arg(long, env = "CAT_DETECT_MODEL", default_value = "best.onnx")]
    pub model: PathBuf,

    /// Archivo con un nombre de clase por línea (por defecto, los metadatos del modelo).
    #[arg(long, env = "CAT_DETECT_LABELS")]
    pub labels: Option<PathBuf>,

    /// Fuente TrueType para escribir las etiquetas sobre la imagen.
    #[arg(long, env = "CAT_DETECT_FONT")]
    pub font: Option<PathBuf>,

    #[arg(long, env = "CAT_DETECT_IMGSZ", default_value_t = 640)]
    pub imgsz: u32,

    #[arg(long, env = "CAT_DETECT_IOU", default_value_t = 0.7)]
    pub iou: f32,

    #[arg(long = "max-det", env = "CAT_DETECT_MAX_DET", default_value_t = 300)]
    pub max_det: usize,
}

impl ModelArgs {
    pub fn inference_config(&self, conf: f32) -> InferenceConfig {
        InferenceConfig {
            model: ModelId::from_path(&self.model.to_string_lossy()),
            params: YoloParams {
                input_size: self.imgsz,
                conf_threshold: conf,
                iou_threshold: self.iou,
                max_detections: self.max_det,
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, env = "CAT_DETECT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "CAT_DETECT_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "CAT_DETECT_CONF", default_value_t = 0.25)]
    pub conf: f32,

    /// Tamaño máximo del archivo subido, en bytes.
    #[arg(long, env = "CAT_DETECT_MAX_UPLOAD", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload: usize,

    /// Carpeta con el frontend compilado, servida como fallback.
    #[arg(long, env = "CAT_DETECT_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Imagen de entrada.
    #[arg(long)]
    pub source: PathBuf,

    #[arg(long, default_value_t = 0.5)]
    pub conf: f32,

    /// Carpeta de salida; se sobrescribe si ya existe.
    #[arg(long, default_value = "runs/detect/predict")]
    pub save_dir: PathBuf,
}
