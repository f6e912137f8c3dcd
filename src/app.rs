//! Main application UI and state management.
//! Renders the deck list, the card editor and the study screens. All data
//! changes go through the deck store; this module only keeps screen state.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use notedex::database::{DeckStore, SqliteStorage};
use notedex::export::{export_deck_to_path, import_deck_from_path};
use notedex::models::{Card, Deck};
use notedex::study::{QuizQuestion, SessionSummary, StudyMode, StudySession};
use notedex::StudyConfig;
use std::fmt::Display;

/// Application screen states
#[derive(Clone, Default)]
enum AppScreen {
    #[default]
    Decks,
    EditCards(String),
    Study,
}

/// Card being edited in place
struct CardDraft {
    card_id: String,
    front: String,
    back: String,
}

/// User intents collected while rendering and applied afterwards
enum Action {
    CreateDeck,
    RequestDeleteDeck { deck_id: String, name: String },
    ConfirmDeleteDeck,
    CancelDeleteDeck,
    OpenEditor(String),
    OpenStudy(String),
    ShowExport,
    Export(String),
    Import,
    RequestRestore,
    ConfirmRestore,
    CancelRestore,
    RenameDeck(String),
    ResetProgress(String),
    AddCard(String),
    BeginEdit(Card),
    SaveEdit(String),
    CancelEdit,
    DeleteCard { deck_id: String, card_id: String },
    StartMode(StudyMode),
    ToggleBack,
    Mark(bool),
    Answer(String),
    NextQuestion,
    BackToDecks,
    DismissMessage,
}

/// Main application state
pub struct NoteDexApp {
    store: DeckStore<SqliteStorage>,
    study_config: StudyConfig,
    decks: Vec<Deck>,
    current_screen: AppScreen,

    new_deck_name: String,
    rename_buffer: String,
    new_front: String,
    new_back: String,
    editing: Option<CardDraft>,

    session: Option<StudySession>,
    show_back: bool,

    pending_delete: Option<(String, String)>,
    confirm_restore: bool,
    show_export_dialog: bool,
    message: Option<String>,
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
}

/// Formats a timestamp as a local YYYY-MM-DD string
fn format_date(time: DateTime<Utc>) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d").to_string()
}

impl eframe::App for NoteDexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen_action = match self.current_screen.clone() {
            AppScreen::Decks => self.render_deck_list(ctx),
            AppScreen::EditCards(deck_id) => self.render_card_editor(ctx, &deck_id),
            AppScreen::Study => self.render_study_screen(ctx),
        };
        let dialog_action = self.render_dialogs(ctx);

        for action in [screen_action, dialog_action].into_iter().flatten() {
            self.apply(action);
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }
    }
}

impl NoteDexApp {
    pub fn new(store: DeckStore<SqliteStorage>, study_config: StudyConfig) -> Self {
        let mut app = Self {
            store,
            study_config,
            decks: Vec::new(),
            current_screen: AppScreen::Decks,
            new_deck_name: String::new(),
            rename_buffer: String::new(),
            new_front: String::new(),
            new_back: String::new(),
            editing: None,
            session: None,
            show_back: false,
            pending_delete: None,
            confirm_restore: false,
            show_export_dialog: false,
            message: None,
            show_confirmation_dialog: false,
            allowed_to_close: false,
        };
        app.refresh();
        app
    }

    /// Reloads the deck list from the store
    fn refresh(&mut self) {
        let result = self.store.list_decks();
        if let Some(decks) = self.report(result) {
            self.decks = decks;
        }
    }

    /// Shows an error in the message window and passes successes through
    fn report<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(error = %e, "operation failed");
                self.message = Some(e.to_string());
                None
            }
        }
    }

    /// Renders the main screen with the deck list
    fn render_deck_list(&mut self, ctx: &egui::Context) -> Option<Action> {
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            // Import/Export buttons
            ui.horizontal(|ui| {
                if ui.button("Export Deck").clicked() {
                    action = Some(Action::ShowExport);
                }
                if ui.button("Import Deck").clicked() {
                    action = Some(Action::Import);
                }
                if ui.button("Restore Sample Decks").clicked() {
                    action = Some(Action::RequestRestore);
                }
            });

            ui.separator();

            ui.heading("Create New Deck");
            ui.horizontal(|ui| {
                ui.label("Deck name:");
                ui.text_edit_singleline(&mut self.new_deck_name);
                if ui.button("Create Deck").clicked() && !self.new_deck_name.trim().is_empty() {
                    action = Some(Action::CreateDeck);
                }
            });

            ui.separator();

            ui.heading(format!("Decks ({})", self.decks.len()));

            if self.decks.is_empty() {
                ui.label("No decks created yet. Create a new deck to begin!");
                return;
            }

            egui::ScrollArea::vertical()
                .id_source("decks_list")
                .show(ui, |ui| {
                    for deck in &self.decks {
                        ui.group(|ui| {
                            ui.label(egui::RichText::new(&deck.name).strong());
                            ui.label(format!("{} cards", deck.cards.len()));

                            let percent = deck.progress_percent();
                            ui.add(
                                egui::ProgressBar::new(percent as f32 / 100.0)
                                    .text(format!("{percent}% known")),
                            );
                            if let Some(at) = deck.progress.last_studied_at {
                                ui.label(format!("Last studied: {}", format_date(at)));
                            }

                            ui.horizontal(|ui| {
                                if ui.button("Study").clicked() {
                                    action = Some(Action::OpenStudy(deck.id.clone()));
                                }
                                if ui.button("Edit Cards").clicked() {
                                    action = Some(Action::OpenEditor(deck.id.clone()));
                                }
                                if ui.button("Delete").clicked() {
                                    action = Some(Action::RequestDeleteDeck {
                                        deck_id: deck.id.clone(),
                                        name: deck.name.clone(),
                                    });
                                }
                            });
                        });
                    }
                });
        });

        action
    }

    /// Renders the card editor for one deck
    fn render_card_editor(&mut self, ctx: &egui::Context, deck_id: &str) -> Option<Action> {
        let Some(deck) = self.decks.iter().find(|d| d.id == deck_id).cloned() else {
            return Some(Action::BackToDecks);
        };
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("< All Decks").clicked() {
                action = Some(Action::BackToDecks);
            }
            ui.heading(format!("Edit: {}", deck.name));

            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.rename_buffer);
                if ui.button("Rename").clicked() && !self.rename_buffer.trim().is_empty() {
                    action = Some(Action::RenameDeck(deck.id.clone()));
                }
                if ui.button("Reset Progress").clicked() {
                    action = Some(Action::ResetProgress(deck.id.clone()));
                }
            });

            ui.separator();

            ui.heading("Add Card");
            ui.horizontal(|ui| {
                ui.label("Front:");
                ui.text_edit_singleline(&mut self.new_front);
            });
            ui.horizontal(|ui| {
                ui.label("Back:");
                ui.text_edit_singleline(&mut self.new_back);
            });
            if ui.button("Add Card").clicked()
                && !self.new_front.is_empty()
                && !self.new_back.is_empty()
            {
                action = Some(Action::AddCard(deck.id.clone()));
            }

            ui.separator();

            ui.heading(format!("Cards ({})", deck.cards.len()));

            egui::ScrollArea::vertical()
                .id_source("cards_list")
                .show(ui, |ui| {
                    for (i, card) in deck.cards.iter().enumerate() {
                        ui.group(|ui| {
                            let draft = self.editing.as_mut().filter(|d| d.card_id == card.id);
                            if let Some(draft) = draft {
                                ui.horizontal(|ui| {
                                    ui.label("Front:");
                                    ui.text_edit_singleline(&mut draft.front);
                                });
                                ui.horizontal(|ui| {
                                    ui.label("Back:");
                                    ui.text_edit_singleline(&mut draft.back);
                                });
                                ui.horizontal(|ui| {
                                    if ui.button("Save").clicked() {
                                        action = Some(Action::SaveEdit(deck.id.clone()));
                                    }
                                    if ui.button("Cancel").clicked() {
                                        action = Some(Action::CancelEdit);
                                    }
                                });
                            } else {
                                ui.label(format!("{}. Front: {}", i + 1, card.front));
                                ui.label(format!("   Back: {}", card.back));
                                ui.horizontal(|ui| {
                                    if ui.button("Edit").clicked() {
                                        action = Some(Action::BeginEdit(card.clone()));
                                    }
                                    if ui.button("Delete").clicked() {
                                        action = Some(Action::DeleteCard {
                                            deck_id: deck.id.clone(),
                                            card_id: card.id.clone(),
                                        });
                                    }
                                });
                            }
                        });
                    }
                });
        });

        action
    }

    /// Renders mode selection, the running pass, or its summary
    fn render_study_screen(&mut self, ctx: &egui::Context) -> Option<Action> {
        let Some(session) = self.session.as_ref() else {
            return Some(Action::BackToDecks);
        };
        let show_back = self.show_back;
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("< All Decks").clicked() {
                action = Some(Action::BackToDecks);
            }
            ui.heading(format!("Study: {}", session.deck().name));
            ui.add_space(10.0);

            let step = if let Some(summary) = session.summary() {
                render_summary(ui, &summary)
            } else {
                match session.mode() {
                    None => render_mode_selection(ui),
                    Some(StudyMode::Flashcards) => render_flashcard(ui, session, show_back),
                    Some(StudyMode::Quiz) => render_quiz(ui, session),
                }
            };
            if step.is_some() {
                action = step;
            }
        });

        action
    }

    /// Delete confirmation, export picker and the message window
    fn render_dialogs(&mut self, ctx: &egui::Context) -> Option<Action> {
        let mut action = None;

        if let Some((_, name)) = &self.pending_delete {
            egui::Window::new("Delete deck?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!(
                        "Are you sure you want to delete the deck \"{name}\" and all its cards?"
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("Delete").clicked() {
                            action = Some(Action::ConfirmDeleteDeck);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(Action::CancelDeleteDeck);
                        }
                    });
                });
        }

        if self.confirm_restore {
            egui::Window::new("Restore sample decks?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("This deletes every deck and card and brings back the sample decks.");
                    ui.horizontal(|ui| {
                        if ui.button("Restore").clicked() {
                            action = Some(Action::ConfirmRestore);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(Action::CancelRestore);
                        }
                    });
                });
        }

        if self.show_export_dialog {
            egui::Window::new("Export Deck")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Select a deck to export:");
                    ui.separator();

                    for deck in &self.decks {
                        if ui
                            .button(format!("{} ({} cards)", deck.name, deck.cards.len()))
                            .clicked()
                        {
                            action = Some(Action::Export(deck.id.clone()));
                        }
                    }

                    ui.separator();

                    if ui.button("Cancel").clicked() {
                        self.show_export_dialog = false;
                    }
                });
        }

        if let Some(message) = &self.message {
            egui::Window::new("NoteDex")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        action = Some(Action::DismissMessage);
                    }
                });
        }

        action
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::CreateDeck => {
                let result = self.store.create_deck(self.new_deck_name.trim());
                if self.report(result).is_some() {
                    self.new_deck_name.clear();
                }
                self.refresh();
            }
            Action::RequestDeleteDeck { deck_id, name } => {
                self.pending_delete = Some((deck_id, name));
            }
            Action::ConfirmDeleteDeck => {
                if let Some((deck_id, _)) = self.pending_delete.take() {
                    let result = self.store.delete_deck(&deck_id);
                    self.report(result);
                    self.refresh();
                }
            }
            Action::CancelDeleteDeck => self.pending_delete = None,
            Action::OpenEditor(deck_id) => {
                self.rename_buffer = self
                    .decks
                    .iter()
                    .find(|d| d.id == deck_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                self.new_front.clear();
                self.new_back.clear();
                self.editing = None;
                self.current_screen = AppScreen::EditCards(deck_id);
            }
            Action::OpenStudy(deck_id) => self.start_study(&deck_id),
            Action::ShowExport => self.show_export_dialog = true,
            Action::Export(deck_id) => self.handle_export(&deck_id),
            Action::Import => self.handle_import(),
            Action::RequestRestore => self.confirm_restore = true,
            Action::ConfirmRestore => {
                self.confirm_restore = false;
                let result = self.store.restore_sample_decks();
                if let Some(decks) = self.report(result) {
                    self.decks = decks;
                }
            }
            Action::CancelRestore => self.confirm_restore = false,
            Action::RenameDeck(deck_id) => {
                let result = self.store.rename_deck(&deck_id, self.rename_buffer.trim());
                self.report(result);
                self.refresh();
            }
            Action::ResetProgress(deck_id) => {
                let result = self.store.reset_progress(&deck_id);
                self.report(result);
                self.refresh();
            }
            Action::AddCard(deck_id) => {
                let result = self.store.add_card(&deck_id, &self.new_front, &self.new_back);
                if self.report(result).is_some() {
                    self.new_front.clear();
                    self.new_back.clear();
                }
                self.refresh();
            }
            Action::BeginEdit(card) => {
                self.editing = Some(CardDraft {
                    card_id: card.id,
                    front: card.front,
                    back: card.back,
                });
            }
            Action::SaveEdit(deck_id) => {
                if let Some(draft) = self.editing.take() {
                    let result =
                        self.store
                            .update_card(&deck_id, &draft.card_id, &draft.front, &draft.back);
                    self.report(result);
                    self.refresh();
                }
            }
            Action::CancelEdit => self.editing = None,
            Action::DeleteCard { deck_id, card_id } => {
                let result = self.store.delete_card(&deck_id, &card_id);
                self.report(result);
                self.refresh();
            }
            Action::StartMode(mode) => {
                if let Some(session) = self.session.as_mut() {
                    session.start(mode);
                    self.show_back = false;
                    if mode == StudyMode::Quiz {
                        let result = session.next_question().map(|_| ());
                        self.report(result);
                    }
                }
            }
            Action::ToggleBack => self.show_back = !self.show_back,
            Action::Mark(is_known) => {
                if let Some(session) = self.session.as_mut() {
                    let result = session.mark(is_known, &mut self.store);
                    self.show_back = false;
                    self.report(result);
                }
            }
            Action::Answer(selected) => {
                if let Some(session) = self.session.as_mut() {
                    let result = session.answer(&selected, &mut self.store).map(|_| ());
                    self.report(result);
                }
            }
            Action::NextQuestion => {
                if let Some(session) = self.session.as_mut() {
                    let result = session.next_question().map(|_| ());
                    self.report(result);
                }
            }
            Action::BackToDecks => {
                self.session = None;
                self.editing = None;
                self.current_screen = AppScreen::Decks;
                self.refresh();
            }
            Action::DismissMessage => self.message = None,
        }
    }

    /// Opens a study session; missing or empty decks end up in the message window
    fn start_study(&mut self, deck_id: &str) {
        let result =
            StudySession::open_seeded(&mut self.store, deck_id, self.study_config.clone(), None);
        if let Some(session) = self.report(result) {
            self.session = Some(session);
            self.show_back = false;
            self.current_screen = AppScreen::Study;
        }
    }

    /// Handles deck export to JSON file
    fn handle_export(&mut self, deck_id: &str) {
        self.show_export_dialog = false;
        let Some(deck) = self.decks.iter().find(|d| d.id == deck_id).cloned() else {
            return;
        };

        // Open file save dialog
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", deck.name))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            let result = export_deck_to_path(&deck, &path);
            if self.report(result).is_some() {
                self.message = Some(format!("Deck '{}' exported successfully!", deck.name));
            }
        }
    }

    /// Handles deck import from JSON file
    fn handle_import(&mut self) {
        // Open file selection dialog
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let deck = match import_deck_from_path(&path) {
            Ok(deck) => deck,
            Err(e) => {
                self.message = Some(format!(
                    "Import failed: {e}\n\nPlease check if the file has correct structure:\n{{\n  \"name\": \"Deck Name\",\n  \"cards\": [{{ \"front\": \"...\", \"back\": \"...\" }}]\n}}"
                ));
                return;
            }
        };

        let name = deck.name.clone();
        let card_count = deck.cards.len();
        let result = self.store.import_deck(deck);
        if self.report(result).is_some() {
            self.message = Some(format!(
                "Deck '{name}' imported successfully with {card_count} cards!"
            ));
        }
        self.refresh();
    }
}

fn render_mode_selection(ui: &mut egui::Ui) -> Option<Action> {
    let mut action = None;
    ui.label("Choose how to study this deck:");
    ui.horizontal(|ui| {
        if ui.button("Flashcards").clicked() {
            action = Some(Action::StartMode(StudyMode::Flashcards));
        }
        if ui.button("Quiz").clicked() {
            action = Some(Action::StartMode(StudyMode::Quiz));
        }
    });
    action
}

fn render_flashcard(ui: &mut egui::Ui, session: &StudySession, show_back: bool) -> Option<Action> {
    let mut action = None;
    let (done, total) = session.position();

    ui.label(format!("Card {} of {}", done + 1, total));
    ui.add(egui::ProgressBar::new(done as f32 / total.max(1) as f32));
    ui.add_space(20.0);

    let card = session.current_card()?;

    ui.group(|ui| {
        ui.set_min_height(200.0);
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(&card.front);
            ui.add_space(20.0);

            if show_back {
                ui.label(&card.back);
            } else {
                ui.label("(Click 'Show Answer' to reveal)");
            }

            ui.add_space(20.0);
        });
    });

    ui.add_space(20.0);

    let flip_label = if show_back { "Hide Answer" } else { "Show Answer" };
    if ui.button(flip_label).clicked() {
        action = Some(Action::ToggleBack);
    }

    ui.horizontal(|ui| {
        if ui.button("Known").clicked() {
            action = Some(Action::Mark(true));
        }
        if ui.button("Unknown").clicked() {
            action = Some(Action::Mark(false));
        }
    });

    action
}

fn render_quiz(ui: &mut egui::Ui, session: &StudySession) -> Option<Action> {
    let question = session.current_question()?;
    let mut action = None;
    let (asked, total) = session.position();

    ui.label(format!("Question {asked} of {total}"));
    ui.add_space(20.0);
    ui.heading(question.prompt());
    ui.add_space(20.0);

    for option in &question.options {
        if question.is_answered() {
            ui.label(option_text(question, option));
        } else if ui.button(option).clicked() {
            action = Some(Action::Answer(option.clone()));
        }
    }

    if let Some(correct) = question.was_correct() {
        ui.add_space(20.0);
        if correct {
            ui.label(egui::RichText::new("Correct!").color(egui::Color32::GREEN));
        } else {
            ui.label(
                egui::RichText::new(format!(
                    "Incorrect, the answer was: {}",
                    question.correct_answer()
                ))
                .color(egui::Color32::RED),
            );
        }
        if ui.button("Next").clicked() {
            action = Some(Action::NextQuestion);
        }
    }

    action
}

/// Colours an answered option: the right answer green, a wrong pick red
fn option_text(question: &QuizQuestion, option: &str) -> egui::RichText {
    if option == question.correct_answer() {
        egui::RichText::new(format!("✔ {option}")).color(egui::Color32::GREEN)
    } else if question.selected.as_deref() == Some(option) {
        egui::RichText::new(format!("✘ {option}")).color(egui::Color32::RED)
    } else {
        egui::RichText::new(option)
    }
}

fn render_summary(ui: &mut egui::Ui, summary: &SessionSummary) -> Option<Action> {
    let mut action = None;

    match summary.mode {
        StudyMode::Flashcards => {
            ui.heading("Session Complete!");
            ui.label(format!("You studied {} cards.", summary.total));
            ui.label(egui::RichText::new(format!("Known: {}", summary.known)).color(egui::Color32::GREEN));
            ui.label(egui::RichText::new(format!("Unknown: {}", summary.unknown)).color(egui::Color32::RED));
        }
        StudyMode::Quiz => {
            ui.heading("Quiz Complete!");
            ui.label(format!("You finished all {} questions.", summary.total));
            ui.label(format!("Correct answers: {}", summary.known));
            ui.label("Your overall deck progress has been updated.");
        }
    }

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        if ui.button("Go to All Decks").clicked() {
            action = Some(Action::BackToDecks);
        }
        let again = match summary.mode {
            StudyMode::Flashcards => "Study Again",
            StudyMode::Quiz => "Quiz Again",
        };
        if ui.button(again).clicked() {
            action = Some(Action::StartMode(summary.mode));
        }
    });

    action
}
