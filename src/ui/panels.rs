use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::charts::ChartSet;
use crate::state::{AppState, FilterDimension};

/// A user interaction with the filter panel, applied after rendering so the
/// panel can draw from a snapshot of the state.
enum FilterAction {
    ToggleSector(String),
    ToggleCompany(String),
    ToggleYear(i32),
    SelectAll(FilterDimension),
    Clear(FilterDimension),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let options = &state.options;
    let selection = &state.selection;
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let sectors = options
                .sector_options
                .iter()
                .map(|s| {
                    (
                        s.clone(),
                        selection.sectors.contains(s),
                        FilterAction::ToggleSector(s.clone()),
                    )
                })
                .collect();
            filter_section(ui, "Sector(s)", FilterDimension::Sector, sectors, &mut actions);

            let companies = options
                .company_options
                .iter()
                .map(|c| {
                    (
                        c.clone(),
                        selection.companies.contains(c),
                        FilterAction::ToggleCompany(c.clone()),
                    )
                })
                .collect();
            filter_section(ui, "Company(s)", FilterDimension::Company, companies, &mut actions);

            let years = options
                .year_options
                .iter()
                .map(|&y| {
                    (
                        y.to_string(),
                        selection.years.contains(&y),
                        FilterAction::ToggleYear(y),
                    )
                })
                .collect();
            filter_section(ui, "Year(s)", FilterDimension::Year, years, &mut actions);
        });

    for action in actions {
        match action {
            FilterAction::ToggleSector(s) => state.toggle_sector(&s),
            FilterAction::ToggleCompany(c) => state.toggle_company(&c),
            FilterAction::ToggleYear(y) => state.toggle_year(y),
            FilterAction::SelectAll(d) => state.select_all(d),
            FilterAction::Clear(d) => state.select_none(d),
        }
    }
}

/// One collapsible multi-select list with All/None buttons.
fn filter_section(
    ui: &mut Ui,
    title: &str,
    dimension: FilterDimension,
    items: Vec<(String, bool, FilterAction)>,
    actions: &mut Vec<FilterAction>,
) {
    // Show count of selected / total in the header
    let n_selected = items.iter().filter(|(_, checked, _)| *checked).count();
    let header_text = format!("{title}  ({n_selected}/{})", items.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    actions.push(FilterAction::SelectAll(dimension));
                }
                if ui.small_button("None").clicked() {
                    actions.push(FilterAction::Clear(dimension));
                }
            });

            for (label, checked, on_toggle) in items {
                let mut checked = checked;
                if ui.checkbox(&mut checked, label).changed() {
                    actions.push(on_toggle);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.sources.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let matching = match &state.charts {
                ChartSet::Ready(charts) => charts.filing_count,
                ChartSet::NoData => 0,
            };
            ui.label(format!("{} filings loaded, {matching} matching", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for the score table, then the topic table, and load both.
pub fn open_data_dialog(state: &mut AppState) {
    let Some(scores) = rfd::FileDialog::new()
        .set_title("Open concreteness score table")
        .add_filter("CSV", &["csv"])
        .pick_file()
    else {
        return;
    };

    let Some(topics) = rfd::FileDialog::new()
        .set_title("Open topic table")
        .add_filter("CSV", &["csv"])
        .pick_file()
    else {
        return;
    };

    state.load(&scores, &topics);
}
