use client_core::{Action, Section, SupportState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{EscalationLogEntry, SubmissionResult};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_action,
};
use crate::ui::theme::{self, badge_style};

#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub initial_section: Section,
}

pub struct SupportHubApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: SupportState,
    status: String,
    status_banner: Option<UiError>,
}

impl SupportHubApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: SupportState::default(),
            status: "Ready".to_string(),
            status_banner: None,
        };
        app.dispatch(Action::Navigate(startup.initial_section));
        app
    }

    fn dispatch(&mut self, action: Action) {
        dispatch_action(&mut self.state, &self.cmd_tx, action, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    self.status = err.banner_text();
                    self.status_banner = Some(err);
                }
                UiEvent::Action(action) => self.dispatch(action),
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("support_hub_header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Support Hub")
                        .size(28.0)
                        .strong()
                        .color(theme::ACCENT_DARK),
                );
                ui.label(
                    egui::RichText::new("Your gateway to exceptional support")
                        .color(theme::MUTED_TEXT),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let mut selected = self.state.section;
                    ui.selectable_value(&mut selected, Section::Query, "Submit Ticket");
                    ui.selectable_value(&mut selected, Section::Escalation, "Escalation Logs");
                    if selected != self.state.section {
                        self.dispatch(Action::Navigate(selected));
                    }
                });
            });
            ui.add_space(8.0);
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("support_hub_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(banner_text) = self.status_banner.as_ref().map(UiError::banner_text) {
                    ui.colored_label(theme::ERROR_TEXT, banner_text);
                    if ui.small_button("Dismiss").clicked() {
                        self.status_banner = None;
                    }
                } else {
                    ui.small(egui::RichText::new(&self.status).weak());
                }
            });
        });
    }

    fn show_query_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create New Ticket");
        ui.label(
            egui::RichText::new("Tell us how we can help you today").color(theme::MUTED_TEXT),
        );
        ui.add_space(12.0);

        ui.label(egui::RichText::new("Subject").strong());
        let mut subject = self.state.form.subject.clone();
        let subject_edit = egui::TextEdit::singleline(&mut subject)
            .hint_text("Brief description of your issue...")
            .desired_width(f32::INFINITY);
        if ui.add(subject_edit).changed() {
            self.dispatch(Action::EditSubject(subject));
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Description").strong());
        let mut description = self.state.form.description.clone();
        let description_edit = egui::TextEdit::multiline(&mut description)
            .hint_text("Please provide detailed information about your issue...")
            .desired_rows(5)
            .desired_width(f32::INFINITY);
        if ui.add(description_edit).changed() {
            self.dispatch(Action::EditDescription(description));
        }

        ui.add_space(12.0);
        let in_flight = self.state.submit_in_flight;
        ui.horizontal(|ui| {
            let label = if in_flight {
                "Submitting..."
            } else {
                "Submit Ticket"
            };
            let button = egui::Button::new(
                egui::RichText::new(label)
                    .strong()
                    .color(egui::Color32::WHITE),
            )
            .fill(theme::ACCENT);
            if ui.add_enabled(self.state.can_submit(), button).clicked() {
                self.dispatch(Action::Submit);
            }
            if in_flight {
                ui.spinner();
            }
        });

        if let Some(notice) = self.state.notice.clone() {
            ui.add_space(8.0);
            ui.colored_label(theme::ERROR_TEXT, notice);
        }

        if let Some(result) = self.state.last_result.clone() {
            ui.add_space(12.0);
            if show_submission_result(ui, &result) {
                self.dispatch(Action::DismissResult);
            }
        }
    }

    fn show_escalation_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Escalation Logs");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    self.dispatch(Action::RefreshLogs);
                }
                if self.state.logs_loading {
                    ui.spinner();
                }
                if let Some(fetched_at) = self.state.logs_fetched_at {
                    ui.small(
                        egui::RichText::new(format!(
                            "Updated {}",
                            fetched_at.format("%H:%M:%S UTC")
                        ))
                        .weak(),
                    );
                }
            });
        });
        ui.add_space(8.0);

        if let Some(error) = &self.state.logs_error {
            message_frame(theme::ERROR_FILL, theme::ERROR_STROKE).show(ui, |ui| {
                ui.label(
                    egui::RichText::new("Error loading escalation logs")
                        .strong()
                        .color(theme::ERROR_TEXT),
                );
                ui.label(egui::RichText::new(error).color(theme::ERROR_TEXT));
                ui.small("Check the application log for more details.");
            });
            ui.add_space(8.0);
        }

        if self.state.logs_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.spinner();
                ui.label("Loading escalation logs...");
            });
            return;
        }

        if self.state.logs_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.label(egui::RichText::new("No Escalations Found").size(20.0).strong());
                ui.label(
                    egui::RichText::new("All tickets are being handled smoothly!")
                        .color(theme::MUTED_TEXT),
                );
            });
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, entry) in self.state.logs.iter().enumerate() {
                    show_log_card(ui, index, entry);
                    ui.add_space(10.0);
                }
            });
    }
}

fn message_frame(fill: egui::Color32, stroke: egui::Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(10)
        .inner_margin(egui::Margin::symmetric(12, 10))
}

/// Returns true when the user dismissed the result.
fn show_submission_result(ui: &mut egui::Ui, result: &SubmissionResult) -> bool {
    let (fill, stroke, text) = if result.is_success() {
        (theme::SUCCESS_FILL, theme::SUCCESS_STROKE, theme::SUCCESS_TEXT)
    } else {
        (theme::ERROR_FILL, theme::ERROR_STROKE, theme::ERROR_TEXT)
    };
    let mut dismissed = false;
    message_frame(fill, stroke).show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new(&result.message).strong().color(text));
            if ui.small_button("✕").clicked() {
                dismissed = true;
            }
        });
    });
    dismissed
}

fn show_log_card(ui: &mut egui::Ui, index: usize, entry: &EscalationLogEntry) {
    egui::Frame::group(ui.style())
        .corner_radius(12)
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&entry.subject).size(18.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let style = badge_style(entry.category_class());
                    egui::Frame::NONE
                        .fill(style.fill)
                        .stroke(style.stroke)
                        .corner_radius(12)
                        .inner_margin(egui::Margin::symmetric(8, 2))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(entry.category_label())
                                    .small()
                                    .color(style.text),
                            );
                        });
                });
            });

            if !entry.description.is_empty() {
                ui.add_space(4.0);
                ui.label(&entry.description);
            }

            let issues = entry.issue_list();
            if !issues.is_empty() || entry.draft_response.is_some() {
                egui::CollapsingHeader::new("Review details")
                    .id_salt(("escalation_review", index))
                    .show(ui, |ui| {
                        for issue in &issues {
                            ui.label(format!("• {issue}"));
                        }
                        if let Some(draft) = &entry.draft_response {
                            ui.add_space(4.0);
                            ui.label(egui::RichText::new("Draft response").strong());
                            ui.label(draft);
                        }
                    });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("Attempts: {}", entry.review_attempts))
                        .color(theme::MUTED_TEXT),
                );
                if let Some(at) = entry.escalated_at() {
                    ui.label(
                        egui::RichText::new(at.format("%Y-%m-%d %H:%M").to_string())
                            .small()
                            .weak(),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new("Active").color(theme::MUTED_TEXT));
                    ui.colored_label(theme::ACTIVE_DOT, "●");
                });
            });
        });
}

impl eframe::App for SupportHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_max_width(900.0);
            match self.state.section {
                Section::Query => self.show_query_section(ui),
                Section::Escalation => self.show_escalation_section(ui),
            }
        });

        if self.state.submit_in_flight || self.state.logs_loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{Effect, RequestId};
    use crossbeam_channel::bounded;
    use shared::protocol::LogSnapshot;

    use super::*;

    #[test]
    fn starting_on_escalation_section_queues_initial_fetch() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        let app = SupportHubApp::bootstrap(
            cmd_tx,
            ui_rx,
            StartupConfig {
                initial_section: Section::Escalation,
            },
        );

        assert!(app.state.logs_loading);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::Run(Effect::FetchLogs { .. }))
        ));
    }

    #[test]
    fn backend_outcomes_are_applied_to_the_store() {
        let (cmd_tx, _cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let mut app = SupportHubApp::bootstrap(
            cmd_tx,
            ui_rx,
            StartupConfig {
                initial_section: Section::Escalation,
            },
        );

        ui_tx
            .try_send(UiEvent::Action(Action::LogsLoaded {
                request_id: RequestId(1),
                snapshot: LogSnapshot::new(vec![EscalationLogEntry {
                    subject: "A".into(),
                    ..EscalationLogEntry::default()
                }]),
            }))
            .expect("send");
        app.process_ui_events();

        assert!(!app.state.logs_loading);
        assert_eq!(app.state.logs.len(), 1);
    }
}
