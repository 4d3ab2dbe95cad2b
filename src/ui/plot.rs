use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, Text,
};

use crate::color::{self, ColorMap};
use crate::data::charts::{ChartSet, DashboardCharts, TrendChart};
use crate::data::model::{Pillar, PillarTopTopic, TopicCount};
use crate::state::AppState;
use crate::ui::widgets;

const TREND_HEIGHT: f32 = 320.0;
const BAR_HEIGHT: f32 = 360.0;
const CARD_HEIGHT: f32 = 140.0;
/// Horizontal offset of the E and G bars around the year.
const PILLAR_BAR_WIDTH: f64 = 0.25;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart panel in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open the score and topic tables to begin  (File → Open data…)");
        });
        return;
    }

    let charts = match &state.charts {
        ChartSet::Ready(charts) => Some(charts.as_ref()),
        ChartSet::NoData => None,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new(crate::APP_TITLE).strong().color(Color32::WHITE));
            });
            ui.add_space(16.0);

            ui.columns(2, |cols| {
                match charts {
                    Some(c) => {
                        trend_plot(
                            &mut cols[0],
                            "esg_trend",
                            "Overall ESG Content Over Years",
                            "Overall ESG content",
                            &c.esg_trend,
                            &state.company_colors,
                        );
                        trend_plot(
                            &mut cols[1],
                            "gri_trend",
                            "GRI Scores Over Years",
                            "GRI",
                            &c.gri_trend,
                            &state.company_colors,
                        );
                    }
                    None => {
                        widgets::no_data(&mut cols[0], TREND_HEIGHT);
                        widgets::no_data(&mut cols[1], TREND_HEIGHT);
                    }
                }
            });
            ui.add_space(16.0);

            match charts {
                Some(c) => pillar_topics_plot(ui, &c.pillar_topics),
                None => widgets::no_data(ui, BAR_HEIGHT),
            }
            ui.add_space(16.0);

            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading("Most Dominant Topics Across Years");
            });
            ui.add_space(8.0);
            theme_cards(ui, charts);
            ui.add_space(16.0);

            ui.horizontal_top(|ui: &mut Ui| {
                let width = ui.available_width();
                ui.allocate_ui(egui::vec2(width * 0.65, BAR_HEIGHT), |ui: &mut Ui| match charts {
                    Some(c) => dominant_topic_plot(ui, &c.dominant_topics, &state.topic_colors),
                    None => widgets::no_data(ui, BAR_HEIGHT),
                });
                let rest = egui::vec2(ui.available_width(), BAR_HEIGHT);
                ui.allocate_ui(rest, |ui: &mut Ui| match charts {
                    Some(c) => widgets::composition_donut(ui, c, BAR_HEIGHT),
                    None => widgets::no_data(ui, BAR_HEIGHT),
                });
            });
        });
}

fn theme_cards(ui: &mut Ui, charts: Option<&DashboardCharts>) {
    ui.columns(4, |cols| {
        let Some(c) = charts else {
            for col in cols.iter_mut() {
                widgets::no_data(col, CARD_HEIGHT);
            }
            return;
        };
        let cards = [
            ("Most Dominant Environmental Theme", &c.cards.environmental, color::ENVIRONMENTAL),
            ("Most Dominant Social Theme", &c.cards.social, color::SOCIAL),
            ("Most Dominant Governance Theme", &c.cards.governance, color::GOVERNANCE),
            ("Most Dominant ESG Theme", &c.cards.combined, color::COMBINED),
        ];
        for (col, (title, topic, stroke)) in cols.iter_mut().zip(cards) {
            widgets::theme_card(col, title, topic, stroke, CARD_HEIGHT);
        }
    });
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

/// Company lines with markers plus the dotted overall average.
fn trend_plot(
    ui: &mut Ui,
    id: &str,
    title: &str,
    y_label: &str,
    chart: &TrendChart,
    colors: &ColorMap,
) {
    chart_title(ui, title);
    Plot::new(id)
        .height(TREND_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Filing Year")
        .y_axis_label(y_label)
        .x_axis_formatter(year_axis)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &chart.companies {
                let c = colors.color_for(&series.name);
                plot_ui.line(
                    Line::new(PlotPoints::from(series.points.clone()))
                        .name(&series.name)
                        .color(c)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(series.points.clone()))
                        .name(&series.name)
                        .color(c)
                        .radius(4.0),
                );
            }

            let avg = &chart.overall_average;
            plot_ui.line(
                Line::new(PlotPoints::from(avg.points.clone()))
                    .name(&avg.name)
                    .color(color::AVERAGE)
                    .width(3.0)
                    .style(LineStyle::dotted_dense()),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(avg.points.clone()))
                    .name(&avg.name)
                    .color(color::AVERAGE)
                    .radius(4.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Grouped E/S/G bars per year, each labelled with its topic.
fn pillar_topics_plot(ui: &mut Ui, topics: &[PillarTopTopic]) {
    chart_title(ui, "Most Discussed E, S, and G Topics per Year");
    Plot::new("pillar_topics")
        .height(BAR_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Filing Year")
        .y_axis_label("Number of Filings")
        .x_axis_formatter(year_axis)
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for pillar in Pillar::ALL {
                let offset = match pillar {
                    Pillar::Environmental => -PILLAR_BAR_WIDTH,
                    Pillar::Social => 0.0,
                    Pillar::Governance => PILLAR_BAR_WIDTH,
                };
                let rows: Vec<&PillarTopTopic> =
                    topics.iter().filter(|t| t.pillar == pillar).collect();
                let bars: Vec<Bar> = rows
                    .iter()
                    .map(|t| {
                        Bar::new(f64::from(t.year) + offset, t.count as f64)
                            .name(&t.topic)
                            .width(PILLAR_BAR_WIDTH * 0.9)
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(pillar.code())
                        .color(color::pillar_color(pillar))
                        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                            format!(
                                "Year: {:.0}\nTopic: {}\nCount: {}",
                                bar.argument.round(),
                                bar.name,
                                bar.value
                            )
                        })),
                );

                for t in rows {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(f64::from(t.year) + offset, t.count as f64),
                            RichText::new(&t.topic).size(10.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM)
                        .color(Color32::WHITE),
                    );
                }
            }
        });
}

/// One bar per year for the dominant topic combination.
fn dominant_topic_plot(ui: &mut Ui, topics: &[TopicCount], colors: &ColorMap) {
    chart_title(ui, "Most Dominant ESG Topic per Year");
    Plot::new("dominant_topics")
        .height(BAR_HEIGHT)
        .x_axis_label("Filing Year")
        .y_axis_label("Count")
        .x_axis_formatter(year_axis)
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for t in topics {
                let bar = Bar::new(f64::from(t.year), t.count as f64)
                    .name(&t.topic)
                    .width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&t.topic)
                        .color(colors.color_for(&t.topic))
                        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                            format!("Year: {:.0}\nTopic: {}", bar.argument, bar.name)
                        })),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chart_title(ui: &mut Ui, title: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(title);
    });
}

/// Label whole years only.
fn year_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}
