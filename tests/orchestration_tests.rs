//! End-to-end tests for prompt testing and interactive chat.
//!
//! A scripted gateway stands in for the completion API so the tests can count
//! calls and inspect every request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use prompt_review::{
    ChatController, ChatSettings, ChatTurn, CompletionError, CompletionErrorKind,
    CompletionGateway, Container, ContainerConfig, Credential, InMemorySessionStore, InteractiveChatUseCase,
    ModelSelection, OutputFormat, PromptTestingUseCase, Role, SessionId, SessionStore,
    StaticModelDirectory, TabVariant,
};

const REFLECT_SUFFIX: &str = "\nReflect on this response and improve it.";

/// Answers from a per-model script and records every request.
#[derive(Default)]
struct ScriptedGateway {
    answers: HashMap<String, String>,
    reflections: HashMap<String, String>,
    failing: Vec<String>,
    failing_reflections: Vec<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, Vec<ChatTurn>)>>,
}

impl ScriptedGateway {
    fn answer(mut self, model: &str, text: &str) -> Self {
        self.answers.insert(model.to_string(), text.to_string());
        self
    }

    fn reflect(mut self, model: &str, text: &str) -> Self {
        self.reflections.insert(model.to_string(), text.to_string());
        self
    }

    fn fail(mut self, model: &str) -> Self {
        self.failing.push(model.to_string());
        self
    }

    fn fail_reflection(mut self, model: &str) -> Self {
        self.failing_reflections.push(model.to_string());
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> Vec<(String, Vec<ChatTurn>)> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn generate_response(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let last = messages.last().map(|m| m.content()).unwrap_or_default();
        let is_reflection = last.ends_with(REFLECT_SUFFIX);

        if is_reflection {
            if self.failing_reflections.iter().any(|m| m == model) {
                return Err(CompletionError::transport("connection reset"));
            }
            return Ok(self
                .reflections
                .get(model)
                .cloned()
                .unwrap_or_else(|| format!("{model} revised")));
        }

        if self.failing.iter().any(|m| m == model) {
            return Err(CompletionError::status(401, "Incorrect API key provided"));
        }
        Ok(self
            .answers
            .get(model)
            .cloned()
            .unwrap_or_else(|| format!("{model} answered")))
    }
}

fn chat_use_case(gateway: Arc<ScriptedGateway>) -> InteractiveChatUseCase {
    InteractiveChatUseCase::new(gateway, Arc::new(InMemorySessionStore::new()))
}

#[tokio::test]
async fn test_prompt_fan_out_builds_tabs_in_order() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .answer("gpt-4o", "Hello.")
            .reflect("gpt-4", "Hello there!"),
    );
    let use_case = PromptTestingUseCase::new(gateway.clone());
    let selection = ModelSelection::new(["gpt-4", "gpt-4o"], ["gpt-4"]).unwrap();

    let result = use_case.execute("Say hi", &selection).await.unwrap();

    // Two normal calls plus one reflection.
    assert_eq!(gateway.call_count(), 3);

    let tabs = result.tabs();
    let titles: Vec<String> = tabs.iter().map(|t| t.title()).collect();
    assert_eq!(
        titles,
        vec!["gpt-4 Normal", "gpt-4o Normal", "gpt-4 Reflection"]
    );
    assert_eq!(tabs[0].body, "Hi!");
    assert_eq!(tabs[1].body, "Hello.");
    assert_eq!(tabs[2].variant, TabVariant::Reflection);
    assert!(tabs[2]
        .body
        .starts_with("Hello there!\n\n**Reflection Response (after "));
    assert!(tabs[2].body.ends_with(" seconds)**"));
}

#[tokio::test]
async fn test_prompt_requests_carry_system_and_user_turns() {
    let gateway = Arc::new(ScriptedGateway::default().answer("gpt-4", "Hi!"));
    let use_case = PromptTestingUseCase::new(gateway.clone());
    let selection = ModelSelection::new(["gpt-4"], ["gpt-4"]).unwrap();

    use_case.execute("Say hi", &selection).await.unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);

    let (_, normal) = &calls[0];
    assert_eq!(normal.len(), 2);
    assert_eq!(normal[0].role(), Role::System);
    assert_eq!(normal[0].content(), "You are a helpful assistant.");
    assert_eq!(normal[1].role(), Role::User);
    assert_eq!(normal[1].content(), "Say hi");

    // The reflection revises the model's own answer, not the prompt.
    let (model, reflection) = &calls[1];
    assert_eq!(model, "gpt-4");
    assert_eq!(
        reflection[1].content(),
        "Hi!\nReflect on this response and improve it."
    );
}

#[tokio::test]
async fn test_one_failing_model_does_not_abort_the_others() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .fail("gpt-4")
            .answer("gpt-4o", "Hello."),
    );
    let use_case = PromptTestingUseCase::new(gateway.clone());
    let selection = ModelSelection::new(["gpt-4", "gpt-4o"], ["gpt-4", "gpt-4o"]).unwrap();

    let result = use_case.execute("Say hi", &selection).await.unwrap();

    // gpt-4's reflection is skipped without a call.
    assert_eq!(gateway.call_count(), 3);
    assert_eq!(result.error_count(), 1);

    let gpt4 = result.get("gpt-4").unwrap();
    assert_eq!(gpt4.normal_response(), "Error: Incorrect API key provided");
    match gpt4.reflection() {
        Some(Err(e)) => assert_eq!(e.kind(), CompletionErrorKind::Skipped),
        other => panic!("expected skipped reflection, got {other:?}"),
    }

    assert_eq!(result.get("gpt-4o").unwrap().normal_response(), "Hello.");
    assert!(result.get("gpt-4o").unwrap().reflection_response().is_some());
}

#[tokio::test]
async fn test_blank_prompt_is_rejected_before_any_call() {
    let gateway = Arc::new(ScriptedGateway::default());
    let use_case = PromptTestingUseCase::new(gateway.clone()).with_concurrency(true);
    let selection = ModelSelection::without_reflection(["gpt-4", "gpt-4o"]).unwrap();

    let err = use_case.execute("   ", &selection).await.unwrap_err();

    assert_eq!(err.to_string(), "Prompt cannot be empty.");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_repeated_prompt_yields_identical_result() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .fail("gpt-4o"),
    );
    let use_case = PromptTestingUseCase::new(gateway.clone());
    let selection = ModelSelection::without_reflection(["gpt-4", "gpt-4o"]).unwrap();

    let first = use_case.execute("Say hi", &selection).await.unwrap();
    let second = use_case.execute("Say hi", &selection).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.tabs(), second.tabs());
    assert_eq!(gateway.call_count(), 4);
}

#[tokio::test]
async fn test_chat_exchange_grows_history_by_two_turns() {
    let gateway = Arc::new(ScriptedGateway::default().answer("gpt-4", "Hi! How can I help?"));
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    let reply = use_case.send(&session, "hello", "gpt-4", false).await.unwrap();
    assert_eq!(reply.content, "Hi! How can I help?");
    assert!(reply.reflection_error.is_none());

    let history = use_case.history(&session).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history.turns()[0], ChatTurn::user("hello"));
    assert_eq!(history.turns()[1], ChatTurn::assistant("Hi! How can I help?"));

    // The request carried the whole conversation, new message last.
    let (_, messages) = &gateway.calls()[0];
    assert_eq!(messages.last().unwrap().content(), "hello");
}

#[tokio::test]
async fn test_chat_sends_prior_turns_as_context() {
    let gateway = Arc::new(ScriptedGateway::default());
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    use_case.send(&session, "first", "gpt-4", false).await.unwrap();
    use_case.send(&session, "second", "gpt-4", false).await.unwrap();

    let calls = gateway.calls();
    let contents: Vec<&str> = calls[1].1.iter().map(|t| t.content()).collect();
    assert!(contents.ends_with(&["first", "gpt-4 answered", "second"]));
    assert_eq!(use_case.history(&session).await.len(), 4);
}

#[tokio::test]
async fn test_chat_reflection_replaces_recorded_answer() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .reflect("gpt-4", "Hello! What can I do for you today?"),
    );
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    let reply = use_case.send(&session, "hello", "gpt-4", true).await.unwrap();

    assert_eq!(gateway.call_count(), 2);
    assert!(reply
        .content
        .starts_with("Hello! What can I do for you today?\n\n**Reflection Response (after "));
    assert!(reply.content.ends_with(" seconds):**"));
    let history = use_case.history(&session).await;
    assert_eq!(history.last().unwrap().content(), reply.content);
}

#[tokio::test]
async fn test_chat_reflection_failure_keeps_normal_answer() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .fail_reflection("gpt-4"),
    );
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    let reply = use_case.send(&session, "hello", "gpt-4", true).await.unwrap();

    assert_eq!(reply.content, "Hi!");
    let err = reply.reflection_error.expect("reflection error reported");
    assert_eq!(err.kind(), CompletionErrorKind::Transport);
    assert_eq!(use_case.history(&session).await.len(), 2);
}

#[tokio::test]
async fn test_chat_failure_leaves_history_untouched() {
    let gateway = Arc::new(ScriptedGateway::default().fail("gpt-4"));
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    let err = use_case
        .send(&session, "hello", "gpt-4", true)
        .await
        .unwrap_err();

    assert!(err.is_completion());
    assert_eq!(err.to_string(), "Error: Incorrect API key provided");
    // No reflection is attempted on a failed answer.
    assert_eq!(gateway.call_count(), 1);
    assert!(use_case.history(&session).await.is_empty());
}

#[tokio::test]
async fn test_chat_blank_message_makes_no_call() {
    let gateway = Arc::new(ScriptedGateway::default());
    let use_case = chat_use_case(gateway.clone());
    let session = SessionId::new();

    let err = use_case.send(&session, "  ", "gpt-4", false).await.unwrap_err();

    assert!(err.is_invalid_input());
    assert_eq!(gateway.call_count(), 0);
    assert!(use_case.history(&session).await.is_empty());
}

#[tokio::test]
async fn test_clear_is_idempotent_and_isolated_per_session() {
    let gateway = Arc::new(ScriptedGateway::default());
    let use_case = chat_use_case(gateway.clone());
    let alice = SessionId::new();
    let bob = SessionId::new();

    use_case.send(&alice, "hi", "gpt-4", false).await.unwrap();
    use_case.send(&bob, "hey", "gpt-4o", false).await.unwrap();

    assert!(use_case.clear(&alice).await);
    assert!(!use_case.clear(&alice).await);

    assert!(use_case.history(&alice).await.is_empty());
    assert_eq!(use_case.history(&bob).await.len(), 2);
}

#[tokio::test]
async fn test_clear_waits_for_in_flight_send() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .slow(Duration::from_millis(200)),
    );
    let store = Arc::new(InMemorySessionStore::new());
    let use_case = InteractiveChatUseCase::new(gateway.clone(), store.clone());
    let session = SessionId::new();

    let (reply, cleared) = tokio::join!(
        use_case.send(&session, "hello", "gpt-4", false),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            use_case.clear(&session).await
        }
    );

    // The clear ran after the exchange was recorded and removed it.
    assert_eq!(reply.unwrap().content, "Hi!");
    assert!(cleared);
    assert!(use_case.history(&session).await.is_empty());
    assert_eq!(store.len().await, 1);

    // Later sends continue on the same session with a fresh context.
    use_case.send(&session, "again", "gpt-4", false).await.unwrap();
    let calls = gateway.calls();
    assert_eq!(calls[1].1.len(), 1);
    assert_eq!(use_case.history(&session).await.len(), 2);
}

#[tokio::test]
async fn test_reads_do_not_create_sessions() {
    let gateway = Arc::new(ScriptedGateway::default());
    let store = Arc::new(InMemorySessionStore::new());
    let use_case = InteractiveChatUseCase::new(gateway, store.clone());
    let session = SessionId::new();

    assert!(use_case.history(&session).await.is_empty());
    assert!(use_case.settings(&session).await.is_none());
    assert!(!use_case.clear(&session).await);

    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_send_records_settings_and_clear_keeps_them() {
    let gateway = Arc::new(ScriptedGateway::default());
    let use_case = chat_use_case(gateway);
    let session = SessionId::new();

    use_case.send(&session, "hello", "gpt-4o", true).await.unwrap();
    assert!(use_case.clear(&session).await);

    assert_eq!(
        use_case.settings(&session).await,
        Some(ChatSettings {
            model: "gpt-4o".to_string(),
            use_reflection: true,
        })
    );
}

fn container(gateway: Arc<ScriptedGateway>) -> Container {
    Container::from_parts(
        gateway,
        Arc::new(StaticModelDirectory::with_models(vec![
            "gpt-4".to_string(),
            "gpt-4o".to_string(),
        ])),
        Credential::new("sk-test").unwrap(),
        ContainerConfig::default(),
    )
}

#[tokio::test]
async fn test_prompt_test_controller_renders_text_tabs() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .answer("gpt-4o", "Hello."),
    );
    let container = container(gateway);
    let controller = prompt_review::connector::PromptTestController::new(&container);

    let output = controller
        .test(
            "Say hi".to_string(),
            vec!["gpt-4".to_string(), "gpt-4o".to_string()],
            vec![],
            OutputFormat::Text,
        )
        .await
        .unwrap();

    assert!(output.starts_with("Chatbot Responses"));
    assert!(output.contains("=== gpt-4 Normal ===\n### gpt-4 (Normal Response)\n\nHi!"));
    assert!(output.contains("=== gpt-4o Normal ===\n### gpt-4o (Normal Response)\n\nHello."));
    assert!(!output.contains("Reflection"));
}

#[tokio::test]
async fn test_prompt_test_controller_rejects_stray_reflection() {
    let gateway = Arc::new(ScriptedGateway::default());
    let container = container(gateway.clone());
    let controller = prompt_review::connector::PromptTestController::new(&container);

    let err = controller
        .test(
            "Say hi".to_string(),
            vec!["gpt-4".to_string()],
            vec!["gpt-4o".to_string()],
            OutputFormat::Json,
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("gpt-4o"));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_prompt_test_controller_json_reports_errors() {
    let gateway = Arc::new(ScriptedGateway::default().fail("gpt-4o"));
    let container = container(gateway);
    let controller = prompt_review::connector::PromptTestController::new(&container);

    let output = controller
        .test(
            "Say hi".to_string(),
            vec!["gpt-4".to_string(), "gpt-4o".to_string()],
            vec!["gpt-4".to_string()],
            OutputFormat::Json,
        )
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        json["tabs"],
        serde_json::json!(["gpt-4 Normal", "gpt-4o Normal", "gpt-4 Reflection"])
    );
    assert!(json["results"][0]["error"].is_null());
    assert!(json["results"][0]["reflection_elapsed_seconds"].is_number());
    assert_eq!(
        json["results"][1]["normal_response"],
        "Error: Incorrect API key provided"
    );
    assert!(json["results"][1]["error"].is_string());
}

#[tokio::test]
async fn test_chat_controller_prints_errors_and_clears() {
    let gateway = Arc::new(ScriptedGateway::default().answer("gpt-4", "Hi!"));
    let container = container(gateway);
    let controller = ChatController::new(&container, "gpt-4", false);

    assert_eq!(controller.send("hello").await.unwrap(), "gpt-4: Hi!");
    assert_eq!(
        controller.send(" ").await.unwrap(),
        "Message cannot be empty."
    );
    assert_eq!(
        controller.transcript().await,
        "user: hello\nassistant: Hi!"
    );

    assert_eq!(controller.clear().await, "Conversation cleared.");
    assert_eq!(controller.transcript().await, "");
}

#[tokio::test]
async fn test_chat_controller_follows_stored_settings() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .answer("gpt-4", "Hi!")
            .answer("gpt-4o", "Hello.")
            .reflect("gpt-4o", "Hello there!"),
    );
    let container = container(gateway.clone());
    let controller = ChatController::new(&container, "gpt-4", false);

    assert_eq!(controller.settings().await.model, "gpt-4");
    assert_eq!(controller.send("hello").await.unwrap(), "gpt-4: Hi!");

    assert_eq!(controller.set_model(" gpt-4o").await, "Chatting with gpt-4o.");
    assert_eq!(controller.set_reflection(true).await, "Reflection enabled.");
    let settings = controller.settings().await;
    assert_eq!(settings.model, "gpt-4o");
    assert!(settings.use_reflection);

    let output = controller.send("and you?").await.unwrap();
    assert!(output.starts_with("gpt-4o: Hello there!"));

    // The new model saw the earlier exchange, then revised its answer.
    let calls = gateway.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].0, "gpt-4o");
    assert_eq!(calls[1].1.len(), 3);
}

#[tokio::test]
async fn test_mock_container_runs_offline() {
    let config = ContainerConfig {
        mock: true,
        ..ContainerConfig::default()
    };
    let container = Container::new(config).unwrap();
    let router = prompt_review::Router::new(&container);

    let models = router.route(prompt_review::Commands::Models).await.unwrap();
    assert!(models.contains("gpt-4-turbo"));

    let first = router
        .route(prompt_review::Commands::Test {
            prompt: "Say hi".to_string(),
            models: vec!["gpt-4".to_string()],
            reflect: vec![],
            format: OutputFormat::Text,
        })
        .await
        .unwrap();
    let second = router
        .route(prompt_review::Commands::Test {
            prompt: "Say hi".to_string(),
            models: vec!["gpt-4".to_string()],
            reflect: vec![],
            format: OutputFormat::Text,
        })
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_live_container_requires_credential() {
    let err = Container::new(ContainerConfig::default()).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Please provide your OpenAI API key to proceed."
    );
}
