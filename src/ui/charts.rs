use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::SeriesColors;
use crate::data::aggregate::{DashboardViews, KpiSummary, YearTypeCount};
use crate::data::model::ContentType;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render KPIs and the six charts for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to explore it  (File → Open…)");
        });
        return;
    }

    let views = &state.views;
    let colors = &state.colors;

    ui.heading("Movies & TV Shows Dashboard");
    ui.label("Interactive analysis of catalog trends (filters + visuals).");
    ui.add_space(6.0);

    kpi_row(ui, &views.kpis);
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        type_chart(&mut cols[0], views, colors);
        growth_chart(&mut cols[1], views, colors);
    });

    ui.add_space(8.0);
    ui.strong("Geographic & Category Insights");
    ui.columns(2, |cols: &mut [Ui]| {
        ranked_bars(
            &mut cols[0],
            "top_countries",
            "Top 10 Content-Producing Countries",
            &views.top_countries,
            colors.accent,
        );
        ranked_bars(
            &mut cols[1],
            "top_genres",
            "Top Genres (Top 12)",
            &views.top_genres,
            colors.accent,
        );
    });

    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        rating_chart(&mut cols[0], views, colors);
        mix_chart(&mut cols[1], &views.year_type_mix, colors);
    });

    ui.separator();
    ui.weak("Tip: use the filters on the left to explore trends by country, year range and content type.");
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, kpis: &KpiSummary) {
    let years = match kpis.years_covered() {
        Ok((lo, hi)) => format!("{lo}–{hi}"),
        Err(_) => "–".to_string(),
    };
    let cells = [
        ("Total Titles", kpis.total.to_string()),
        ("Movies", kpis.movies.to_string()),
        ("TV Shows", kpis.tv_shows.to_string()),
        ("Years Covered", years),
    ];

    ui.columns(cells.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(cells) {
            col.vertical(|ui: &mut Ui| {
                ui.label(label);
                ui.label(RichText::new(value).size(28.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn no_data(ui: &mut Ui, title: &str) {
    ui.strong(title);
    ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("No data for the current filters");
        });
    });
}

/// Plot preset for categorical charts: fixed view, no panning.
fn static_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

/// Movies vs TV shows.
fn type_chart(ui: &mut Ui, views: &DashboardViews, colors: &SeriesColors) {
    const TITLE: &str = "Movies vs TV Shows";
    if views.type_counts.is_empty() {
        return no_data(ui, TITLE);
    }
    ui.strong(TITLE);

    let total = views.kpis.total.max(1) as f64;
    let bars: Vec<Bar> = views
        .type_counts
        .iter()
        .enumerate()
        .map(|(i, (t, count))| {
            let share = *count as f64 / total * 100.0;
            Bar::new(i as f64, *count as f64)
                .name(format!("{t}: {count} ({share:.1}%)"))
                .fill(colors.color_for(*t))
        })
        .collect();
    let labels = views.type_counts.iter().map(|(t, _)| t.to_string()).collect();

    static_plot("type_counts")
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

/// Titles added per year.
fn growth_chart(ui: &mut Ui, views: &DashboardViews, colors: &SeriesColors) {
    const TITLE: &str = "Titles Added Over Time";
    if views.yearly_growth.is_empty() {
        return no_data(ui, TITLE);
    }
    ui.strong(TITLE);

    let points: Vec<[f64; 2]> = views
        .yearly_growth
        .iter()
        .map(|(year, count)| [*year as f64, *count as f64])
        .collect();

    Plot::new("yearly_growth")
        .height(CHART_HEIGHT)
        .x_axis_label("year added")
        .y_axis_label("titles added")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("titles added")
                    .color(colors.accent)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.5)
                    .color(colors.accent),
            );
        });
}

/// Horizontal ranking, largest bar on top.
fn ranked_bars(ui: &mut Ui, id: &str, title: &str, ranking: &[(String, usize)], color: Color32) {
    if ranking.is_empty() {
        return no_data(ui, title);
    }
    ui.strong(title);

    // Ascending so the most frequent entry is drawn at the top.
    let ascending: Vec<&(String, usize)> = ranking.iter().rev().collect();
    let bars: Vec<Bar> = ascending
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(format!("{label}: {count}"))
                .fill(color)
        })
        .collect();
    let labels = ascending.iter().map(|(label, _)| label.clone()).collect();

    static_plot(id)
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
        });
}

/// Titles per rating, first-seen order.
fn rating_chart(ui: &mut Ui, views: &DashboardViews, colors: &SeriesColors) {
    const TITLE: &str = "Ratings Distribution";
    if views.rating_distribution.is_empty() {
        return no_data(ui, TITLE);
    }
    ui.strong(TITLE);

    let bars: Vec<Bar> = views
        .rating_distribution
        .iter()
        .enumerate()
        .map(|(i, (rating, count))| {
            Bar::new(i as f64, *count as f64)
                .name(format!("{rating}: {count}"))
                .fill(colors.accent)
        })
        .collect();
    let labels = views
        .rating_distribution
        .iter()
        .map(|(rating, _)| rating.clone())
        .collect();

    static_plot("ratings")
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7));
        });
}

/// Per-year stacked bars, one series per content type.
fn mix_chart(ui: &mut Ui, mix: &[YearTypeCount], colors: &SeriesColors) {
    const TITLE: &str = "Content Mix Over Time (Movies vs TV Shows)";
    if mix.is_empty() {
        return no_data(ui, TITLE);
    }
    ui.strong(TITLE);

    let series = stacked_series(mix);
    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for (content_type, bars) in series {
        let chart = BarChart::new(bars)
            .name(content_type.label())
            .color(colors.color_for(content_type))
            .width(0.8);
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = chart.stack_on(&below);
        charts.push(chart);
    }

    Plot::new("year_type_mix")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("year added")
        .y_axis_label("titles")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// One bar list per content type, aligned on the same years (missing
/// combinations become zero-height bars) so `stack_on` can pair them by
/// index.
fn stacked_series(mix: &[YearTypeCount]) -> Vec<(ContentType, Vec<Bar>)> {
    let years: BTreeSet<i32> = mix.iter().map(|c| c.year_added).collect();
    let types: BTreeSet<ContentType> = mix.iter().map(|c| c.content_type).collect();

    types
        .into_iter()
        .map(|t| {
            let bars = years
                .iter()
                .map(|&year| {
                    let titles = mix
                        .iter()
                        .find(|c| c.year_added == year && c.content_type == t)
                        .map_or(0, |c| c.titles);
                    Bar::new(year as f64, titles as f64).name(format!("{t} {year}: {titles}"))
                })
                .collect();
            (t, bars)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_axis_labels_integer_marks_only() {
        let fmt = category_axis(vec!["PG".to_string(), "R".to_string()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(0.0), &range), "PG");
        assert_eq!(fmt(mark(1.0), &range), "R");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }

    #[test]
    fn stacked_series_are_aligned_per_year() {
        let mix = vec![
            YearTypeCount {
                year_added: 2018,
                content_type: ContentType::Movie,
                titles: 4,
            },
            YearTypeCount {
                year_added: 2020,
                content_type: ContentType::TvShow,
                titles: 2,
            },
        ];
        let series = stacked_series(&mix);
        assert_eq!(series.len(), 2);
        let heights: Vec<Vec<f64>> = series
            .iter()
            .map(|(_, bars)| bars.iter().map(|b| b.value).collect())
            .collect();
        assert_eq!(heights, vec![vec![4.0, 0.0], vec![0.0, 2.0]]);
    }
}
