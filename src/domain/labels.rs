/// Tabla fija índice de clase -> nombre, propiedad del detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resuelve el nombre de una clase. Los índices fuera de la tabla
    /// se reportan como `class_<id>` para no perder la detección.
    pub fn name(&self, class_id: usize) -> String {
        self.names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", class_id))
    }
}
