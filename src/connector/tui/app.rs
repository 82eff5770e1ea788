use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{ChatTurn, ModelSelection, ResultTab, SessionId, TestResult};
use crate::ModelCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    PromptTesting,
    Chatbot,
}

impl Mode {
    pub fn title(&self) -> &'static str {
        match self {
            Mode::PromptTesting => "Prompt Testing",
            Mode::Chatbot => "Interactive Chatbot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Credential,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Models,
    Input,
    Results,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Models => Focus::Input,
            Focus::Input => Focus::Results,
            Focus::Results => Focus::Models,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// Work the event loop must carry out after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    SubmitCredential(String),
    SubmitTest {
        prompt: String,
        selection: ModelSelection,
    },
    SendChat {
        message: String,
        model: String,
        use_reflection: bool,
    },
    ClearChat,
}

/// All state the terminal UI renders from.
pub struct App {
    pub screen: Screen,
    pub mode: Mode,
    pub focus: Focus,
    pub credential_input: String,
    pub models: Vec<String>,
    pub models_are_fallback: bool,
    pub cursor: usize,
    selected: Vec<String>,
    pub reflection_enabled: bool,
    reflect_on: Vec<String>,
    pub chat_model: Option<String>,
    pub input: String,
    pub tabs: Vec<ResultTab>,
    pub active_tab: usize,
    pub transcript: Vec<ChatTurn>,
    pub scroll: u16,
    pub status: Option<Status>,
    pub busy: bool,
    pub session_id: SessionId,
}

impl App {
    pub fn new(needs_credential: bool) -> Self {
        let mut app = Self {
            screen: if needs_credential {
                Screen::Credential
            } else {
                Screen::Main
            },
            mode: Mode::PromptTesting,
            focus: Focus::Models,
            credential_input: String::new(),
            models: Vec::new(),
            models_are_fallback: false,
            cursor: 0,
            selected: Vec::new(),
            reflection_enabled: false,
            reflect_on: Vec::new(),
            chat_model: None,
            input: String::new(),
            tabs: Vec::new(),
            active_tab: 0,
            transcript: Vec::new(),
            scroll: 0,
            status: None,
            busy: false,
            session_id: SessionId::new(),
        };
        if needs_credential {
            app.warn("Please provide your OpenAI API key to proceed.");
        }
        app
    }

    pub fn set_catalog(&mut self, catalog: ModelCatalog) {
        self.models_are_fallback = catalog.is_fallback();
        self.models = catalog.models;
        self.cursor = 0;
        self.selected.retain(|m| self.models.contains(m));
        self.reflect_on.retain(|m| self.models.contains(m));
        if self
            .chat_model
            .as_ref()
            .map_or(true, |m| !self.models.contains(m))
        {
            self.chat_model = self.models.first().cloned();
        }
        self.screen = Screen::Main;
        if self.models_are_fallback {
            self.warn("Could not fetch models; showing the built-in list.");
        } else {
            self.info(format!("{} models available.", self.models.len()));
        }
    }

    pub fn is_selected(&self, model: &str) -> bool {
        self.selected.iter().any(|m| m == model)
    }

    pub fn reflects_on(&self, model: &str) -> bool {
        self.reflection_enabled && self.reflect_on.iter().any(|m| m == model)
    }

    /// Selected models in list order, and the reflection subset.
    pub fn selection(&self) -> Result<ModelSelection, crate::DomainError> {
        let models: Vec<&String> = self.models.iter().filter(|m| self.is_selected(m)).collect();
        let reflect: Vec<&String> = self.models.iter().filter(|m| self.reflects_on(m)).collect();
        ModelSelection::new(models.into_iter().cloned(), reflect.into_iter().cloned())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.busy {
            return Action::None;
        }

        match self.screen {
            Screen::Credential => self.handle_credential_key(key),
            Screen::Main => self.handle_main_key(key),
        }
    }

    fn handle_credential_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Enter => {
                let key = self.credential_input.trim().to_string();
                if key.is_empty() {
                    self.warn("Please provide your OpenAI API key to proceed.");
                    Action::None
                } else {
                    Action::SubmitCredential(key)
                }
            }
            KeyCode::Backspace => {
                self.credential_input.pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.credential_input.push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::F(1) => {
                self.switch_mode(Mode::PromptTesting);
                return Action::None;
            }
            KeyCode::F(2) => {
                self.switch_mode(Mode::Chatbot);
                return Action::None;
            }
            KeyCode::Char('r') if ctrl => {
                self.toggle_reflection();
                return Action::None;
            }
            KeyCode::Char('l') if ctrl => {
                return if self.mode == Mode::Chatbot {
                    Action::ClearChat
                } else {
                    Action::None
                };
            }
            _ => {}
        }

        match self.focus {
            Focus::Models => self.handle_models_key(key),
            Focus::Input => self.handle_input_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    fn handle_models_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(self.models.len().saturating_sub(1))
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_cursor(),
            KeyCode::Char('r') => self.toggle_reflect_on_cursor(),
            _ => {}
        }
        Action::None
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Action::None
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Left if !self.tabs.is_empty() => {
                self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
                self.scroll = 0;
            }
            KeyCode::Right if !self.tabs.is_empty() => {
                self.active_tab = (self.active_tab + 1) % self.tabs.len();
                self.scroll = 0;
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            _ => {}
        }
        Action::None
    }

    fn switch_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.scroll = 0;
            self.status = None;
        }
    }

    fn toggle_reflection(&mut self) {
        self.reflection_enabled = !self.reflection_enabled;
        let state = if self.reflection_enabled { "enabled" } else { "disabled" };
        self.info(format!("Reflection {state}."));
    }

    fn activate_cursor(&mut self) {
        let Some(model) = self.models.get(self.cursor).cloned() else {
            return;
        };

        match self.mode {
            Mode::PromptTesting => {
                if self.is_selected(&model) {
                    self.selected.retain(|m| m != &model);
                    // Reflection targets must stay a subset of the selection.
                    self.reflect_on.retain(|m| m != &model);
                } else {
                    self.selected.push(model);
                }
            }
            Mode::Chatbot => {
                self.info(format!("Chatting with {model}."));
                self.chat_model = Some(model);
            }
        }
    }

    fn toggle_reflect_on_cursor(&mut self) {
        if self.mode != Mode::PromptTesting {
            return;
        }
        let Some(model) = self.models.get(self.cursor).cloned() else {
            return;
        };
        if !self.reflection_enabled {
            self.warn("Enable reflection first (Ctrl+R).");
        } else if !self.is_selected(&model) {
            self.warn(format!("Select {model} before reflecting on it."));
        } else if self.reflect_on.contains(&model) {
            self.reflect_on.retain(|m| m != &model);
        } else {
            self.reflect_on.push(model);
        }
    }

    fn submit(&mut self) -> Action {
        match self.mode {
            Mode::PromptTesting => match self.selection() {
                Ok(selection) => Action::SubmitTest {
                    prompt: self.input.clone(),
                    selection,
                },
                Err(e) => {
                    self.warn(e.to_string());
                    Action::None
                }
            },
            Mode::Chatbot => match self.chat_model.clone() {
                Some(model) => Action::SendChat {
                    message: self.input.clone(),
                    model,
                    use_reflection: self.reflection_enabled,
                },
                None => {
                    self.warn("Please select at least one model to proceed.");
                    Action::None
                }
            },
        }
    }

    pub fn show_test_result(&mut self, result: &TestResult) {
        self.tabs = result.tabs();
        self.active_tab = 0;
        self.scroll = 0;
        self.focus = Focus::Results;
        let errors = result.error_count();
        if errors > 0 {
            self.warn(format!("{errors} of {} models returned an error.", result.len()));
        } else {
            self.info(format!("Received {} responses.", self.tabs.len()));
        }
    }

    pub fn show_transcript(&mut self, turns: Vec<ChatTurn>) {
        self.transcript = turns;
        self.input.clear();
        self.scroll = 0;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text);
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }
}
