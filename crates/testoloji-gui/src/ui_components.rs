use eframe::egui;
use testoloji_layout::{AnswerLetter, Difficulty};

/// Builder for sliders that report whether the value changed
pub struct SliderBuilder<'a, T> {
    value: &'a mut T,
    range: std::ops::RangeInclusive<T>,
    text: String,
    suffix: Option<String>,
    step: Option<f64>,
}

impl<'a, T> SliderBuilder<'a, T>
where
    T: egui::emath::Numeric,
{
    pub fn new(value: &'a mut T, range: std::ops::RangeInclusive<T>) -> Self {
        Self {
            value,
            range,
            text: String::new(),
            suffix: None,
            step: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let mut slider = egui::Slider::new(self.value, self.range);

        if !self.text.is_empty() {
            slider = slider.text(self.text);
        }
        if let Some(suffix) = self.suffix {
            slider = slider.suffix(suffix);
        }
        if let Some(step) = self.step {
            slider = slider.step_by(step);
        }

        ui.add(slider).changed()
    }
}

/// Labeled drag value limited to a range
pub fn labeled_drag_clamped<T>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    range: std::ops::RangeInclusive<T>,
    suffix: &str,
) -> bool
where
    T: egui::emath::Numeric,
{
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range).suffix(suffix).speed(0.5))
            .changed()
    })
    .inner
}

/// Enum selector using ComboBox
pub fn enum_selector<T>(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    value: &mut T,
    options: &[(T, &str)],
) -> bool
where
    T: PartialEq + Clone,
{
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);

        let current_text = options
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, text)| *text)
            .unwrap_or("Unknown");

        egui::ComboBox::from_id_salt(id)
            .selected_text(current_text)
            .show_ui(ui, |ui| {
                for (option_value, option_text) in options {
                    changed |= ui
                        .selectable_value(value, option_value.clone(), *option_text)
                        .changed();
                }
            });
    });
    changed
}

/// Horizontal button group for enum selection
pub fn button_group<T>(ui: &mut egui::Ui, value: &mut T, options: &[(T, &str)]) -> bool
where
    T: PartialEq + Clone,
{
    let mut changed = false;
    ui.horizontal(|ui| {
        for (option_value, option_text) in options {
            changed |= ui
                .selectable_value(value, option_value.clone(), *option_text)
                .changed();
        }
    });
    changed
}

/// A–E toggle row; clicking the chosen letter again clears it
pub fn answer_picker(ui: &mut egui::Ui, answer: &mut Option<AnswerLetter>) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Answer:");
        for letter in AnswerLetter::ALL {
            let selected = *answer == Some(letter);
            if ui.selectable_label(selected, letter.to_string()).clicked() {
                *answer = if selected { None } else { Some(letter) };
                changed = true;
            }
        }
    });
    changed
}

/// Optional 1–10 difficulty; 0 on the slider means unset
pub fn difficulty_picker(ui: &mut egui::Ui, difficulty: &mut Option<Difficulty>) -> bool {
    let mut value = difficulty.map(Difficulty::value).unwrap_or(0);
    let changed = ui
        .horizontal(|ui| {
            ui.label("Difficulty:");
            SliderBuilder::new(&mut value, 0..=Difficulty::MAX)
                .step(1.0)
                .show(ui)
        })
        .inner;

    if changed {
        *difficulty = Difficulty::new(value).ok();
    }
    changed
}
