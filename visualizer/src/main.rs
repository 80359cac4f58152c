use field_canvas::FieldCanvas;
use fieldcore::interaction::{FixedPrompts, InputEvent, InteractionController, Outcome, PointerButton, VisibilityFlag};
use iced::{
    widget::{
        button,
        canvas::{Cache, Canvas},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Element, Length, Theme,
};
use log::{info, warn};
use std::path::PathBuf;

mod field_canvas;

const HISTORY_LIMIT: usize = 20;
const DEFAULT_EXPORT_NAME: &str = "field.svg";

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Electrostatics Field Visualizer".into()
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Light
}

struct Visualizer {
    controller: InteractionController,
    cache: Cache,
    prompt: Option<PendingPrompt>,
    status: String,
    history: Vec<String>,
}

/// An open inline prompt. The event that opened it is replayed through the
/// controller once the user confirms or cancels.
#[derive(Debug, Clone)]
enum PendingPrompt {
    Magnitude { event: InputEvent, value: String },
    ExportPath { value: String },
}

#[derive(Debug, Clone)]
enum Message {
    Input(InputEvent),
    PromptChanged(String),
    PromptConfirmed,
    PromptCancelled,
}

impl Visualizer {
    fn boot() -> Self {
        Self {
            controller: InteractionController::default(),
            cache: Cache::new(),
            prompt: None,
            status: "Click to place charges.".into(),
            history: Vec::new(),
        }
    }

    fn update(state: &mut Self, message: Message) {
        match message {
            Message::Input(event) if state.prompt.is_none() => state.on_input(event),
            Message::Input(_) => {}
            Message::PromptChanged(value) => match &mut state.prompt {
                Some(PendingPrompt::Magnitude { value: current, .. })
                | Some(PendingPrompt::ExportPath { value: current }) => *current = value,
                None => {}
            },
            Message::PromptConfirmed => {
                if let Some(prompt) = state.prompt.take() {
                    state.resolve(prompt, true);
                }
            }
            Message::PromptCancelled => {
                if let Some(prompt) = state.prompt.take() {
                    state.resolve(prompt, false);
                }
            }
        }
    }

    fn on_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer {
                button: PointerButton::Primary,
                modifier: true,
                x,
                y,
            } => {
                if let Some(charge) = self
                    .controller
                    .hit_test(x, y)
                    .and_then(|index| self.controller.charges().get(index))
                {
                    self.prompt = Some(PendingPrompt::Magnitude {
                        event,
                        value: format!("{}", charge.magnitude),
                    });
                    self.status = "Enter the new charge magnitude.".into();
                    return;
                }
            }
            InputEvent::Key('s') => {
                self.prompt = Some(PendingPrompt::ExportPath {
                    value: DEFAULT_EXPORT_NAME.into(),
                });
                self.status = "Enter a file name for the SVG export.".into();
                return;
            }
            _ => {}
        }
        self.dispatch(event, &mut FixedPrompts::default());
    }

    fn resolve(&mut self, prompt: PendingPrompt, confirmed: bool) {
        match prompt {
            PendingPrompt::Magnitude { event, value } => {
                let mut prompts = FixedPrompts {
                    magnitude: confirmed.then(|| value.trim().parse().ok()).flatten(),
                    export_path: None,
                };
                self.dispatch(event, &mut prompts);
            }
            PendingPrompt::ExportPath { value } => {
                let value = value.trim();
                let mut prompts = if confirmed && !value.is_empty() {
                    FixedPrompts::export_to(PathBuf::from(value))
                } else {
                    FixedPrompts::default()
                };
                self.dispatch(InputEvent::Key('s'), &mut prompts);
            }
        }
    }

    fn dispatch(&mut self, event: InputEvent, prompts: &mut FixedPrompts) {
        match self.controller.handle(event, prompts) {
            Ok(Outcome::Ignored) => {}
            Ok(outcome) => {
                if outcome.rerendered() {
                    self.cache.clear();
                }
                self.status = describe(&outcome);
                info!("{}", self.status);
                self.push_history(self.status.clone());
            }
            Err(err) => {
                warn!("event {event:?} failed: {err}");
                self.status = format!("Error: {err}");
                self.push_history(self.status.clone());
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let canvas = Canvas::new(FieldCanvas {
            scene: state.controller.scene(),
            cache: &state.cache,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let visibility = state.controller.visibility();
        let summary = state.controller.scene().summary();
        let on_off = |visible: bool| if visible { "on" } else { "off" };

        let prompt_panel: Element<'_, Message> = match &state.prompt {
            Some(PendingPrompt::Magnitude { value, .. }) => prompt_row("Magnitude", value),
            Some(PendingPrompt::ExportPath { value }) => prompt_row("File name", value),
            None => Column::new().into(),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let side_panel = column![
            text("Controls").size(26),
            text("Left click: positive charge").size(13),
            text("Right click: negative charge / remove charge").size(13),
            text("Shift + left click: edit charge magnitude").size(13),
            text("1: field lines, 2: equipotential lines, 3: equipotential map").size(13),
            text("C: clear charges, S: save SVG").size(13),
            prompt_panel,
            text(&state.status).size(14),
            text(format!(
                "Charges: {} | lines {} ({}) | equipotentials {} ({}) | map {}",
                state.controller.charges().len(),
                summary.field_lines,
                on_off(visibility.field_lines),
                summary.equipotential_paths,
                on_off(visibility.equipotential_lines),
                on_off(visibility.equipotential_map),
            ))
            .size(12),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(240.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0));

        let layout = row![side_panel, canvas]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }
}

fn prompt_row<'a>(label: &'a str, value: &'a str) -> Element<'a, Message> {
    column![
        text(label).size(16),
        text_input(label, value)
            .on_input(Message::PromptChanged)
            .on_submit(Message::PromptConfirmed)
            .padding(6),
        row![
            button("OK").on_press(Message::PromptConfirmed).padding(8),
            button("Cancel").on_press(Message::PromptCancelled).padding(8),
        ]
        .spacing(8),
    ]
    .spacing(6)
    .into()
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added { charge, .. } => format!(
            "Added {:+} at ({:.2}, {:.2})",
            charge.magnitude, charge.x, charge.y
        ),
        Outcome::Removed { charge, .. } => format!(
            "Removed {:+} at ({:.2}, {:.2})",
            charge.magnitude, charge.x, charge.y
        ),
        Outcome::Modified { index, from, to } => {
            format!("Charge #{} changed from {from} to {to}", index + 1)
        }
        Outcome::EditCancelled { index } => format!("Charge #{} left unchanged", index + 1),
        Outcome::Toggled { flag, visible } => {
            let name = match flag {
                VisibilityFlag::FieldLines => "Field lines",
                VisibilityFlag::EquipotentialLines => "Equipotential lines",
                VisibilityFlag::EquipotentialMap => "Equipotential map",
            };
            format!("{name} {}", if *visible { "shown" } else { "hidden" })
        }
        Outcome::Cleared { removed } => format!("Cleared {removed} charges"),
        Outcome::Exported(path) => format!("Saved {}", path.display()),
        Outcome::ExportCancelled => "Export cancelled".into(),
        Outcome::Ignored => String::new(),
    }
}
