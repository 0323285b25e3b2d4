use super::Cop;

/// Cops in registration order. A cop's position is its index everywhere a
/// per-cop table is kept (configs, filters, style tallies).
pub struct CopRegistry {
    cops: Vec<Box<dyn Cop>>,
}

impl CopRegistry {
    pub fn new() -> Self {
        Self { cops: Vec::new() }
    }

    /// Build the default registry with all built-in cops.
    pub fn default_registry() -> Self {
        let mut registry = Self::new();
        super::style::register_all(&mut registry);
        registry
    }

    pub fn register(&mut self, cop: Box<dyn Cop>) {
        self.cops.push(cop);
    }

    pub fn cops(&self) -> &[Box<dyn Cop>] {
        &self.cops
    }
}

impl Default for CopRegistry {
    fn default() -> Self {
        Self::default_registry()
    }
}
