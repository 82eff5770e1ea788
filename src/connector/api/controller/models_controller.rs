use anyhow::Result;

use crate::ModelCatalog;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let catalog = use_case.execute(self.container.credential()).await;
        Ok(self.format_catalog(&catalog))
    }

    fn format_catalog(&self, catalog: &ModelCatalog) -> String {
        let mut output = if catalog.is_fallback() {
            format!(
                "No models returned by {}; built-in models:\n\n",
                self.container.base_url()
            )
        } else {
            format!("Available models ({}):\n\n", catalog.models.len())
        };

        for model in &catalog.models {
            output.push_str(&format!("  {}\n", model));
        }

        output
    }
}
