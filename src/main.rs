use std::sync::Arc;

use clap::Parser;
use tower_http::services::ServeDir;

use cat_detect::adapters::{
    cli::{Cli, Command, ModelArgs, PredictArgs, ServeArgs},
    http::{router, state::HttpState},
    onnx::{detector::OnnxDetector, model_catalog::OnnxModelCatalog},
    predict::run_predict,
    render::plotter::BoxPlotter,
};
use cat_detect::application::{
    ports::{AnnotatorPort, DetectorPort, ModelCatalogPort},
    services::DetectionService,
    upload::DEFAULT_MAX_UPLOAD_BYTES,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Predict(args) => predict(args).await,
    }
}

/// Construye el servicio de detección: valida y carga el modelo una sola vez.
async fn build_service(model: &ModelArgs, conf: f32, max_upload: usize) -> anyhow::Result<DetectionService> {
    let config = model.inference_config(conf);

    tracing::info!("🔧 Validando modelo {}...", config.model.onnx_path);
    OnnxModelCatalog::new().validate_model(&config.model).await?;

    let labels_path = model.labels.clone();
    let detector = tokio::task::spawn_blocking(move || OnnxDetector::load(config, labels_path.as_deref()))
        .await??;

    let plotter = match &model.font {
        Some(path) => BoxPlotter::with_font_file(path)?,
        None => BoxPlotter::from_system_fonts(),
    };

    let detector: Arc<dyn DetectorPort> = Arc::new(detector);
    let annotator: Arc<dyn AnnotatorPort> = Arc::new(plotter);
    Ok(DetectionService::new(detector, annotator, max_upload))
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let service = build_service(&args.model, args.conf, args.max_upload).await?;

    let state = HttpState {
        detection: Arc::new(service),
    };

    let mut app = router(state);
    if let Some(dir) = &args.static_dir {
        tracing::info!("📂 Archivos estáticos servidos desde '{}'", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    let addr = args.addr()?;
    tracing::info!("🚀 API de detección de gatos en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn predict(args: PredictArgs) -> anyhow::Result<()> {
    let service = build_service(&args.model, args.conf, DEFAULT_MAX_UPLOAD_BYTES).await?;

    let output = run_predict(&service, &args.source, &args.save_dir).await?;
    println!("{}", serde_json::to_string_pretty(&output.summaries)?);

    Ok(())
}
