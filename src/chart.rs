/// Renders a labeled bar chart.
pub trait ChartRenderer {
    fn bar_chart(&self, labels: &[String], values: &[f64], x_label: &str, y_label: &str, title: &str);
}

/// Terminal renderer: one row of '#' per label, scaled to the largest
/// value.
pub struct TextChart {
    width: usize,
}

impl TextChart {
    pub fn new() -> Self {
        Self { width: 40 }
    }

    fn bar_lines(&self, labels: &[String], values: &[f64]) -> Vec<String> {
        let max = values.iter().cloned().fold(0.0, f64::max);
        let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        labels
            .iter()
            .zip(values)
            .map(|(label, &value)| {
                let filled = if max > 0.0 {
                    ((value / max) * self.width as f64).round() as usize
                } else {
                    0
                };
                format!(
                    "{:<lw$} | {:<bw$} {:.2}",
                    label,
                    "#".repeat(filled),
                    value,
                    lw = label_width,
                    bw = self.width
                )
            })
            .collect()
    }
}

impl Default for TextChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for TextChart {
    fn bar_chart(&self, labels: &[String], values: &[f64], x_label: &str, y_label: &str, title: &str) {
        println!("{}", title);
        println!("{} / {}", x_label, y_label);
        for line in self.bar_lines(labels, values) {
            println!("{}", line);
        }
    }
}
