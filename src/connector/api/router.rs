use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{ModelsController, PromptTestController};

pub struct Router<'a> {
    models_controller: ModelsController<'a>,
    prompt_test_controller: PromptTestController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            models_controller: ModelsController::new(container),
            prompt_test_controller: PromptTestController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Models => self.models_controller.list().await,
            Commands::Test {
                prompt,
                models,
                reflect,
                format,
            } => {
                self.prompt_test_controller
                    .test(prompt, models, reflect, format)
                    .await
            }
            Commands::Chat { .. } | Commands::Ui => {
                unreachable!("interactive commands are handled separately in main")
            }
        }
    }
}
