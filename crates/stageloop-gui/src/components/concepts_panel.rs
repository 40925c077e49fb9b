use crate::theme::{card, spacing};
use eframe::egui;

struct ConceptEntry {
    title: &'static str,
    body: &'static str,
}

const KEY_CONCEPTS: [ConceptEntry; 4] = [
    ConceptEntry {
        title: "Mental Models",
        body: "Users have their own mental models of how a system should work.",
    },
    ConceptEntry {
        title: "Gulfs of Execution and Evaluation",
        body: "Problems arise when there is a gap between the user's mental model \
               and the system's actual functioning.",
    },
    ConceptEntry {
        title: "Mapping",
        body: "A good design ensures a clear and intuitive mapping between the \
               user's intended actions and the system's actual operations.",
    },
    ConceptEntry {
        title: "Feedback",
        body: "Users need to receive immediate and understandable feedback from \
               the system to effectively evaluate the outcome of their actions.",
    },
];

pub struct ConceptsPanel;

impl ConceptsPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(spacing::ITEM_SPACING);
        ui.label(
            egui::RichText::new("Key Concepts")
                .heading()
                .color(ui.visuals().strong_text_color()),
        );
        ui.add_space(spacing::ITEM_SPACING);

        ui.columns(KEY_CONCEPTS.len(), |columns| {
            for (column, concept) in columns.iter_mut().zip(KEY_CONCEPTS.iter()) {
                card(column, |ui| {
                    ui.label(egui::RichText::new(concept.title).strong());
                    ui.add_space(spacing::ITEM_SPACING / 2.0);
                    ui.label(
                        egui::RichText::new(concept.body)
                            .small()
                            .color(ui.visuals().weak_text_color()),
                    );
                });
            }
        });

        ui.add_space(spacing::ITEM_SPACING);
    }
}
