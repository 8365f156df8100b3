use eframe::egui::{self, Align2, Color32};
use egui_plot::{HLine, Legend, LineStyle, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::figure::{Emphasis, Figure, Panel};

const DESCENDANT: Color32 = Color32::from_rgb(31, 119, 180);

fn color(emphasis: Emphasis) -> Color32 {
    match emphasis {
        Emphasis::Primary => Color32::BLACK,
        Emphasis::Descendant => DESCENDANT,
    }
}

/// A runnable egui application showing a scaling-dimension [`Figure`].
pub struct PlotApp {
    figure: Figure,
}

impl PlotApp {
    #[must_use]
    pub fn new(figure: Figure) -> Self {
        Self { figure }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn run(self, name: &str) -> Result<(), eframe::Error> {
        eframe::run_native(
            name,
            eframe::NativeOptions::default(),
            Box::new(|_cc| Ok(Box::new(self))),
        )
    }
}

fn show_panel(ui: &mut egui::Ui, panel: &Panel, height: f32, x_label: bool) {
    let mut plot = Plot::new(panel.label)
        .legend(Legend::default())
        .height(height)
        .include_x(panel.x_range[0])
        .include_x(panel.x_range[1])
        .include_y(panel.y_range[0])
        .include_y(panel.y_range[1])
        .y_axis_label(panel.label);
    if x_label {
        plot = plot.x_axis_label("RG step");
    }

    plot.show(ui, |plot_ui| {
        for line in &panel.references {
            plot_ui.hline(
                HLine::new(line.y)
                    .color(color(line.emphasis))
                    .style(LineStyle::Dashed { length: 6.0 }),
            );
        }

        for (emphasis, name) in [
            (Emphasis::Primary, "primary"),
            (Emphasis::Descendant, "descendant"),
        ] {
            let points: Vec<PlotPoint> = panel
                .markers
                .iter()
                .filter(|m| m.emphasis == emphasis)
                .map(|m| PlotPoint::new(m.x, m.y))
                .collect();

            plot_ui.points(
                Points::new(PlotPoints::Owned(points))
                    .name(name)
                    .color(color(emphasis))
                    .radius(3.0),
            );
        }

        for note in &panel.annotations {
            plot_ui.text(
                Text::new(PlotPoint::new(note.x, note.y), note.text.as_str())
                    .anchor(Align2::LEFT_BOTTOM),
            );
        }
    });
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let height = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;
            show_panel(ui, &self.figure.even, height, false);
            show_panel(ui, &self.figure.odd, height, true);
        });
    }
}
