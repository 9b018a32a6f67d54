use std::ops::RangeInclusive;

use bikeshare_dashboard::data::aggregation::{DailyTotal, RfmRow};
use bikeshare_dashboard::data::model::CategoryColumn;
use bikeshare_dashboard::data::report::Dashboard;
use chrono::{Datelike, NaiveDate};
use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{HIGHLIGHT, generate_palette, ranked_bar_colors};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics and charts for the selected range.
pub fn dashboard_view(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let text = if state.dataset.is_none() {
                "Open a file to view the dashboard  (File → Open…)"
            } else {
                "Pick a start date on or before the end date"
            };
            ui.heading(text);
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bike Sharing Dashboard ✨");
            ui.add_space(8.0);

            ui.strong("Daily Sharing");
            let s = &dashboard.summary;
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Total Sharing Bike", s.total_sharing.to_string());
                metric(&mut cols[1], "Total Registered", s.total_registered.to_string());
                metric(&mut cols[2], "Total Casual", s.total_casual.to_string());
            });
            daily_chart(ui, &dashboard.daily);
            ui.separator();

            ui.strong("How does a working day relate to daily rentals?");
            category_chart(ui, dashboard, CategoryColumn::WorkingDay);
            ui.separator();

            ui.strong("How does the weather affect daily rentals?");
            category_chart(ui, dashboard, CategoryColumn::Weather);
            ui.separator();

            ui.strong("Best Days Based on RFM Parameters");
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Average Recency (days)", s.recency_label());
                metric(&mut cols[1], "Average Frequency", s.frequency_label());
                metric(
                    &mut cols[2],
                    "Average Monetary",
                    s.monetary_label(&state.config.currency_symbol),
                );
            });
            ui.columns(3, |cols| {
                rfm_chart(&mut cols[0], "By Recency (days)", &dashboard.top_recency, |r| {
                    r.recency as f64
                });
                rfm_chart(&mut cols[1], "By Frequency", &dashboard.top_frequency, |r| {
                    r.frequency as f64
                });
                rfm_chart(&mut cols[2], "By Monetary", &dashboard.top_monetary, |r| {
                    r.monetary as f64
                });
            });

            ui.add_space(12.0);
            ui.label(RichText::new("Copyright (c) Bike Sharing Dashboard").small().weak());
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(26.0).strong());
}

// ---------------------------------------------------------------------------
// Daily line chart
// ---------------------------------------------------------------------------

fn day_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_day(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn daily_chart(ui: &mut Ui, daily: &[DailyTotal]) {
    let palette = generate_palette(3);
    let series: [(&str, fn(&DailyTotal) -> u64, _); 3] = [
        ("Total", |d| d.sharing_total, HIGHLIGHT),
        ("Registered", |d| d.registered_total, palette[1]),
        ("Casual", |d| d.casual_total, palette[2]),
    ];

    Plot::new("daily_sharing")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Rentals")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            x_to_day(mark.value).map(|d| d.to_string()).unwrap_or_default()
        })
        .label_formatter(|name: &str, value: &PlotPoint| {
            let day = x_to_day(value.x).map(|d| d.to_string()).unwrap_or_default();
            if name.is_empty() {
                day
            } else {
                format!("{name}\n{day}: {:.0}", value.y)
            }
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (name, value, color) in series {
                let points: Vec<[f64; 2]> = daily
                    .iter()
                    .map(|d| [day_to_x(d.date), value(d) as f64])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(name)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Bar chart with string labels on the x axis, one bar per label.
fn labelled_bar_chart(ui: &mut Ui, id: &str, labels: Vec<String>, values: Vec<f64>, highlight_first: bool) {
    let colors = if highlight_first {
        ranked_bar_colors(values.len())
    } else {
        vec![HIGHLIGHT; values.len()]
    };

    let bars: Vec<Bar> = values
        .iter()
        .zip(&labels)
        .zip(colors)
        .enumerate()
        .map(|(i, ((&v, label), color))| Bar::new(i as f64, v).name(label).fill(color))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

fn category_chart(ui: &mut Ui, dashboard: &Dashboard, column: CategoryColumn) {
    let rows = dashboard.ranked_categories(column);
    let labels = rows.iter().map(|r| column.label(r.category)).collect();
    let values = rows.iter().map(|r| r.count as f64).collect();
    labelled_bar_chart(ui, column.title(), labels, values, true);
}

fn rfm_chart(ui: &mut Ui, title: &str, rows: &[RfmRow], value: impl Fn(&RfmRow) -> f64) {
    ui.label(RichText::new(title).strong());
    let labels = rows.iter().map(|r| r.index.to_string()).collect();
    let values = rows.iter().map(value).collect();
    labelled_bar_chart(ui, title, labels, values, false);
}
