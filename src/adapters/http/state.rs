use std::sync::Arc;
use crate::application::services::DetectionService;

/// Estado compartido para los manejadores HTTP de Axum.
/// El detector se carga una vez al arrancar y viaja aquí como handle explícito.
#[derive(Clone)]
pub struct HttpState {
    pub detection: Arc<DetectionService>,
}
