pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, OutputFormat};

pub use application::{
    CatalogSource, ChatReply, ChatSettings, CompletionGateway, InteractiveChatUseCase, ListModelsUseCase,
    ModelCatalog, ModelDirectory, PromptTestingUseCase, SessionStore,
};

pub use connector::{
    ChatController, Container, ContainerConfig, InMemorySessionStore, MockCompletionGateway,
    OpenAiCompletionGateway, OpenAiModelDirectory, Router, StaticModelDirectory,
};

pub use domain::{
    ChatTurn, CompletionError, CompletionErrorKind, ConversationHistory, Credential, DomainError,
    ModelResult, ModelSelection, Reflection, ResultTab, Role, SessionId, SessionState, TabVariant,
    TestResult, FALLBACK_MODELS,
};
