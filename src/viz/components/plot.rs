use ratatui::{prelude::*, style::Stylize, widgets::*};

use crate::train::Progress;

pub struct Plot {
    pub x_title: String,
    pub y_title: String,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    data: Vec<(f64, f64)>,
}

impl Plot {
    pub fn new(y_label: &str) -> Self {
        Self {
            x_title: String::from("Episode"),
            y_title: String::from(y_label),
            x_bounds: [f64::MAX, f64::MIN],
            y_bounds: [f64::MAX, f64::MIN],
            x_labels: Vec::new(),
            y_labels: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Provide initial x bounds
    pub fn with_x_bounds(mut self, x_bounds: [f64; 2]) -> Self {
        self.x_bounds = x_bounds;
        self.x_labels = labels(self.x_bounds, 0);
        self
    }

    /// Provide initial y bounds
    pub fn with_y_bounds(mut self, y_bounds: [f64; 2]) -> Self {
        self.y_bounds = y_bounds;
        self.y_labels = labels(self.y_bounds, 2);
        self
    }

    pub fn update(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        let x_bounds = [self.x_bounds[0].min(x), self.x_bounds[1].max(x)];
        let y_bounds = [self.y_bounds[0].min(y), self.y_bounds[1].max(y)];

        if x_bounds != self.x_bounds {
            self.x_bounds = x_bounds;
            self.x_labels = labels(x_bounds, 0);
        }
        if y_bounds != self.y_bounds {
            self.y_bounds = y_bounds;
            self.y_labels = labels(y_bounds, 2);
        }

        self.data.push(point);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

fn labels(bounds: [f64; 2], precision: usize) -> Vec<String> {
    bounds.iter().map(|b| format!("{b:.precision$}")).collect()
}

impl Widget for &Plot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .cyan()
            .data(&self.data);

        let x_axis = Axis::default()
            .title(self.x_title.as_str())
            .dark_gray()
            .labels(self.x_labels.iter().map(|l| l.clone().bold()).collect())
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.y_title.as_str())
            .dark_gray()
            .labels(self.y_labels.iter().map(|l| l.clone().bold()).collect())
            .bounds(self.y_bounds);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Plots")
            .padding(Padding::uniform(4));

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// Per-episode training curves, one selected at a time
pub struct Plots {
    plot_names: [&'static str; 3],
    plots: [Plot; 3],
    selected: usize,
}

impl Plots {
    pub const NAMES: [&'static str; 3] = ["Score", "Average", "Epsilon"];

    pub fn new(max_episodes: u32) -> Self {
        let x_bounds = [0.0, max_episodes.into()];
        Self {
            plot_names: Self::NAMES,
            plots: [
                Plot::new("Score").with_x_bounds(x_bounds),
                Plot::new("Average").with_x_bounds(x_bounds),
                Plot::new("Epsilon")
                    .with_x_bounds(x_bounds)
                    .with_y_bounds([0.0, 1.0]),
            ],
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.plot_names.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn next_plot(&mut self) {
        self.selected = (self.selected + 1) % self.len()
    }

    pub fn prev_plot(&mut self) {
        let len = self.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn update(&mut self, progress: &Progress<'_>) {
        let episode = f64::from(progress.episode);
        let metrics = [
            f64::from(progress.score),
            f64::from(progress.average),
            f64::from(progress.epsilon),
        ];
        for (plot, metric) in self.plots.iter_mut().zip(metrics) {
            plot.update((episode, metric));
        }
    }
}

impl Widget for &Plots {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Tabs::new(self.plot_names)
            .block(Block::default().padding(Padding::uniform(2)))
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(area, buf);

        self.plots[self.selected].render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(episode: u32, score: u32, epsilon: f32) -> Progress<'static> {
        Progress {
            episode,
            max_episodes: 100,
            score,
            reward: 0.0,
            steps: 1,
            average: score as f32,
            best_score: score,
            epsilon,
            scores: &[],
        }
    }

    #[test]
    fn bounds_grow_with_data() {
        let mut plot = Plot::new("Score").with_x_bounds([0.0, 10.0]);
        plot.update((3.0, 2.0));
        plot.update((12.0, -1.0));
        assert_eq!(plot.x_bounds, [0.0, 12.0]);
        assert_eq!(plot.y_bounds, [-1.0, 2.0]);
        assert_eq!(plot.x_labels, ["0", "12"]);
        assert_eq!(plot.len(), 2);
    }

    #[test]
    fn one_point_per_metric() {
        let mut plots = Plots::new(100);
        plots.update(&progress(1, 3, 0.9));
        plots.update(&progress(2, 0, 0.8));
        assert!(plots.plots.iter().all(|p| p.len() == 2));
        assert_eq!(plots.plots[0].y_bounds, [0.0, 3.0]);
        assert_eq!(plots.plots[2].y_bounds, [0.0, 1.0], "epsilon keeps its unit range");
    }

    #[test]
    fn plot_selection_wraps() {
        let mut plots = Plots::new(10);
        plots.prev_plot();
        assert_eq!(plots.selected(), 2);
        plots.next_plot();
        assert_eq!(plots.selected(), 0);
    }
}
