//! Shell state and command execution.

use crate::commands::{Command, CommandError, CommandRegistry};
use crate::view::{render_snapshot, render_themes, render_tray};
use mythic_core::{
    CollectionError, CollectionStore, DropKind, ExplorationSession, GenerationError, Insight,
    InteractionController, MockGenerator, Snapshot, ThemeCatalog,
    explore::DEFAULT_GENERATION_DELAY,
};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the simulated generation latency.
pub const GENERATION_DELAY_ENV: &str = "MYTHIC_GENERATION_DELAY_MS";

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub prompt: String,
    pub generation_delay: Duration,
    /// Collections created at startup.
    pub seed_collections: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Mythic Machines".to_string(),
            prompt: "mythic> ".to_string(),
            generation_delay: DEFAULT_GENERATION_DELAY,
            seed_collections: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the generation delay taken from the environment if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(GENERATION_DELAY_ENV) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.generation_delay = Duration::from_millis(ms),
                Err(_) => log::warn!("Ignoring invalid {}: {:?}", GENERATION_DELAY_ENV, value),
            }
        }
        config
    }
}

/// Errors surfaced to the shell user. None of them end the session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("Unknown theme: {0}")]
    UnknownTheme(u32),
    #[error("Nothing generated yet")]
    NothingToCapture,
    #[error("No drag in progress")]
    NoDrag,
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// The shell: owns the interaction controller, the exploration session and
/// the tray of captured insights not yet dropped anywhere.
pub struct App {
    config: AppConfig,
    controller: InteractionController,
    explorer: ExplorationSession,
    generator: MockGenerator,
    catalog: ThemeCatalog,
    tray: Vec<Insight>,
    /// Encoded payload of the drag in progress, as a drag channel would hold it.
    drag_channel: Option<String>,
    /// Latest snapshot rendering pushed by the controller, not yet printed.
    pending_render: Rc<RefCell<Option<String>>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut store = CollectionStore::new();
        for title in &config.seed_collections {
            if let Err(e) = store.create_collection(title.clone(), None) {
                log::warn!("Could not seed collection {:?}: {}", title, e);
            }
        }

        let pending_render = Rc::new(RefCell::new(None));
        let mut controller = InteractionController::new(store);
        let sink = Rc::clone(&pending_render);
        controller.subscribe(move |snapshot: &Arc<Snapshot>| {
            *sink.borrow_mut() = Some(render_snapshot(snapshot, None));
        });

        Self {
            generator: MockGenerator::new(config.generation_delay),
            config,
            controller,
            explorer: ExplorationSession::new(),
            catalog: ThemeCatalog::builtin(),
            tray: Vec::new(),
            drag_channel: None,
            pending_render,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn tray(&self) -> &[Insight] {
        &self.tray
    }

    /// Take the rendering of the latest committed snapshot, if any.
    pub fn take_render(&self) -> Option<String> {
        self.pending_render.borrow_mut().take()
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(stdout, "{} (type `help` for commands)", self.config.title)?;

        let mut line = String::new();
        loop {
            write!(stdout, "{}", self.config.prompt)?;
            stdout.flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let command = match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(stdout, "error: {e}")?;
                    continue;
                }
            };

            if command == Command::Generate && self.explorer.can_generate() {
                writeln!(stdout, "Generating...")?;
            }

            match self.execute(command).await {
                Ok(output) => write!(stdout, "{output}")?,
                Err(e) => writeln!(stdout, "error: {e}")?,
            }
            if let Some(render) = self.take_render() {
                write!(stdout, "{render}")?;
            }
        }

        log::info!("Shell closed");
        Ok(())
    }

    /// Execute one command and return the text to show.
    pub async fn execute(&mut self, command: Command) -> Result<String, AppError> {
        let output = match command {
            Command::Help => CommandRegistry::help_text(),
            Command::Quit => String::new(),
            Command::Show => {
                let snapshot = self.controller.snapshot();
                let armed = self.controller.drag().hover_target();
                render_snapshot(&snapshot, armed) + &render_tray(&self.tray)
            }
            Command::Json => {
                let snapshot = self.controller.snapshot();
                let json = serde_json::to_string_pretty(&*snapshot)
                    .map_err(|e| AppError::Serialization(e.to_string()))?;
                json + "\n"
            }
            Command::Themes => render_themes(&self.catalog, self.explorer.theme().map(|t| t.id)),
            Command::SelectTheme(id) => {
                let theme = self.catalog.get(id).cloned().ok_or(AppError::UnknownTheme(id))?;
                let line = format!("Selected {}: {}\n", theme.title, theme.description);
                self.explorer.select_theme(theme);
                line
            }
            Command::Input(text) => {
                self.explorer.set_input(text);
                String::new()
            }
            Command::Generate => {
                let text = self.explorer.generate(&self.generator).await?;
                format!("{text}\n")
            }
            Command::Capture => {
                let insight = self
                    .explorer
                    .capture_insight()
                    .ok_or(AppError::NothingToCapture)?;
                let line = format!("Captured insight {}\n", insight.id);
                self.tray.push(insight);
                line
            }
            Command::NewCollection { title, description } => {
                let (id, _) = self.controller.on_create_collection(title, description)?;
                format!("Created collection {id}\n")
            }
            Command::EditCollection {
                id,
                title,
                description,
            } => {
                self.controller.on_edit_collection(id, title, description)?;
                String::new()
            }
            Command::DeleteCollection(id) => {
                self.controller.on_delete_collection(id)?;
                String::new()
            }
            Command::Drag(insight_id) => {
                let payload = match self.tray.iter().position(|i| i.id == insight_id) {
                    Some(index) => {
                        let insight = self.tray[index].clone();
                        self.controller.on_drag_start(&insight, index)?
                    }
                    None => self.controller.on_drag_start_by_id(insight_id)?,
                };
                self.drag_channel = Some(payload);
                format!("Dragging insight {insight_id}\n")
            }
            Command::Over(id) => {
                self.controller.on_drag_over(id);
                String::new()
            }
            Command::Leave(id) => {
                self.controller.on_drag_leave(id);
                String::new()
            }
            Command::Drop { id, index } => {
                let payload = self.drag_channel.take().ok_or(AppError::NoDrag)?;
                let outcome = self.controller.on_drop(id, &payload, index)?;
                self.tray.retain(|i| i.id != outcome.insight_id);
                match outcome.kind {
                    DropKind::Assigned => {
                        format!("Insight {} added to collection {}\n", outcome.insight_id, id)
                    }
                    DropKind::Moved { from } => format!(
                        "Insight {} moved from collection {} to {}\n",
                        outcome.insight_id, from, id
                    ),
                    DropKind::Repositioned => format!(
                        "Insight {} repositioned in collection {}\n",
                        outcome.insight_id, id
                    ),
                }
            }
            Command::DropOutside => {
                self.drag_channel = None;
                self.controller.on_drop_outside();
                String::new()
            }
            Command::Cancel => {
                self.drag_channel = None;
                self.controller.on_drag_cancel();
                String::new()
            }
            Command::DeleteInsight {
                collection,
                insight,
            } => {
                self.controller.on_delete_insight(collection, insight)?;
                String::new()
            }
            Command::Reorder {
                collection,
                from,
                to,
            } => {
                self.controller.on_reorder(collection, from, to)?;
                String::new()
            }
        };
        Ok(output)
    }
}
