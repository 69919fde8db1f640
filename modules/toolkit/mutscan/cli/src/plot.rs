use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Result, WrapErr};
use itertools::Itertools;

use mutscan_core_rs::nuc::Nuc;
use mutscan_rs::table::Table;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 80.0;
const XTICK_STEP: usize = 75;
const YTICKS: usize = 5;

#[derive(Args)]
pub struct Plot {
    /// Mutation frequencies of the first dataset
    #[arg(long, value_name = "CSV")]
    dataset1: PathBuf,

    /// Mutation frequencies of the second dataset
    #[arg(long, value_name = "CSV")]
    dataset2: PathBuf,

    /// Enrichment table
    #[arg(long, value_name = "CSV")]
    enrichment: PathBuf,
}

impl Plot {
    pub fn run(self) -> Result<()> {
        for (path, name) in [
            (&self.dataset1, "Dataset 1"),
            (&self.dataset2, "Dataset 2"),
            (&self.enrichment, "Enrichment"),
        ] {
            if !path.exists() {
                log::warn!("File {} not found, skipping", path.display());
                continue;
            }

            let table = Table::from_path(path)?;
            let total = table.iter().map(|row| (*row.position(), *row.total())).collect_vec();
            BarChart::new(format!("Mutation Frequencies - {name}"), "Total", total)
                .save(&output_path(path, "total"))?;

            for nuc in Nuc::ALL {
                let values = table
                    .iter()
                    .map(|row| (*row.position(), row.per_base()[nuc]))
                    .collect_vec();
                BarChart::new(
                    format!("{nuc} Mutation Frequencies - {name}"),
                    &nuc.to_string(),
                    values,
                )
                .save(&output_path(path, &nuc.to_string()))?;
            }
        }
        Ok(())
    }
}

/// `results/table.csv` -> `results/table_<suffix>.svg`
fn output_path(table: &Path, suffix: &str) -> PathBuf {
    let name = table
        .file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = stem.strip_suffix(".csv").unwrap_or(stem);
    table.with_file_name(format!("{stem}_{suffix}.svg"))
}

/// Minimal SVG bar chart: one bar per position, y axis in percents.
struct BarChart {
    title: String,
    ylabel: String,
    values: Vec<(usize, f64)>,
}

impl BarChart {
    fn new(title: String, column: &str, values: Vec<(usize, f64)>) -> Self {
        Self {
            title,
            ylabel: format!("{column} Mutation Percentage (%)"),
            values,
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        let mut saveto = BufWriter::new(
            File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?,
        );
        self.render(&mut saveto)
            .and_then(|_| Ok(saveto.flush()?))
            .wrap_err_with(|| format!("Failed to render {}", path.display()))?;
        log::info!("Plot saved as {}", path.display());
        Ok(())
    }

    fn render(&self, saveto: &mut impl Write) -> Result<()> {
        let last = self.values.iter().map(|(pos, _)| *pos).max().unwrap_or(0);
        let xticks = (0..last + XTICK_STEP).step_by(XTICK_STEP).collect_vec();
        let xmax = (last + 1).max(xticks.last().copied().unwrap_or(0)) as f64;

        let (mut ymin, mut ymax) = self
            .values
            .iter()
            .fold((0.0f64, 0.0f64), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
        if ymax - ymin <= f64::EPSILON {
            ymax = ymin + 1.0;
        }
        let pad = (ymax - ymin) * 0.05;
        if ymin < 0.0 {
            ymin -= pad;
        }
        ymax += pad;

        let (plot_w, plot_h) = (
            WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        );
        let x = |pos: f64| MARGIN_LEFT + pos / xmax * plot_w;
        let y = |val: f64| MARGIN_TOP + (ymax - val) / (ymax - ymin) * plot_h;

        writeln!(
            saveto,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )?;
        writeln!(saveto, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            saveto,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            MARGIN_TOP / 2.0,
            escape(&self.title)
        )?;

        // Horizontal grid with y labels
        for ind in 0..=YTICKS {
            let val = ymin + (ymax - ymin) * ind as f64 / YTICKS as f64;
            let ypos = y(val);
            writeln!(
                saveto,
                r#"<line x1="{MARGIN_LEFT}" y1="{ypos:.2}" x2="{:.2}" y2="{ypos:.2}" stroke="lightgray" stroke-width="0.5" stroke-dasharray="4,3"/>"#,
                MARGIN_LEFT + plot_w
            )?;
            writeln!(
                saveto,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end" font-size="11">{val:.1}</text>"#,
                MARGIN_LEFT - 6.0,
                ypos + 4.0
            )?;
        }

        // Bars
        let barw = plot_w / xmax;
        let zero = y(0.0);
        for (pos, val) in &self.values {
            let top = y(val.max(0.0));
            let height = (y(val.min(0.0)) - top).abs();
            writeln!(
                saveto,
                r#"<rect class="bar" x="{:.2}" y="{top:.2}" width="{barw:.2}" height="{height:.2}" fill="steelblue"/>"#,
                x(*pos as f64 - 0.5)
            )?;
        }

        // Axes
        writeln!(
            saveto,
            r#"<line x1="{MARGIN_LEFT}" y1="{zero:.2}" x2="{:.2}" y2="{zero:.2}" stroke="black"/>"#,
            MARGIN_LEFT + plot_w
        )?;
        writeln!(
            saveto,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.2}" stroke="black"/>"#,
            MARGIN_TOP + plot_h
        )?;

        // X ticks are rotated by 45 degrees
        let base = MARGIN_TOP + plot_h;
        for tick in &xticks {
            let xpos = x(*tick as f64);
            writeln!(
                saveto,
                r#"<line x1="{xpos:.2}" y1="{base:.2}" x2="{xpos:.2}" y2="{:.2}" stroke="black"/>"#,
                base + 5.0
            )?;
            writeln!(
                saveto,
                r#"<text x="{xpos:.2}" y="{:.2}" text-anchor="end" font-size="11" transform="rotate(-45 {xpos:.2} {:.2})">{tick}</text>"#,
                base + 18.0,
                base + 18.0
            )?;
        }

        writeln!(
            saveto,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="13">Position</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 15.0
        )?;
        writeln!(
            saveto,
            r#"<text x="20" y="{:.2}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {:.2})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape(&self.ylabel)
        )?;
        writeln!(saveto, "</svg>")?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscan_io_rs::WriteRecord;
    use mutscan_rs::table::{Row, Writer};
    use mutscan_core_rs::nuc::PerNuc;

    #[test]
    fn test_output_path() {
        for (table, suffix, expected) in [
            ("results/enrichment.csv", "total", "results/enrichment_total.svg"),
            ("results/dataset1.csv.gz", "A", "results/dataset1_A.svg"),
            ("table", "G", "table_G.svg"),
        ] {
            assert_eq!(output_path(Path::new(table), suffix), PathBuf::from(expected));
        }
    }

    #[test]
    fn test_render() -> Result<()> {
        let values = (1..=200).map(|pos| (pos, (pos % 7) as f64 - 3.0)).collect_vec();
        let chart = BarChart::new("A & B".to_string(), "Total", values);

        let mut buffer = Vec::new();
        chart.render(&mut buffer)?;
        let svg = String::from_utf8(buffer)?;

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 200);
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("Total Mutation Percentage (%)"));
        // 0, 75, 150, 225
        assert!(svg.contains(">225</text>"));
        assert!(!svg.contains(">300</text>"));
        Ok(())
    }

    #[test]
    fn test_plot_tables() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let dataset1 = dir.path().join("dataset1.csv");

        let mut writer = Writer::<_, f64>::from_path(&dataset1)?;
        writer.write_records(
            [
                Row::new(1, b'A', 0.0, PerNuc::default()),
                Row::new(2, b'C', 50.0, PerNuc::from([50.0, 0.0, 0.0, 0.0])),
            ]
            .iter(),
        )?;
        writer.finish()?;

        Plot {
            dataset1: dataset1.clone(),
            dataset2: dir.path().join("missing.csv"),
            enrichment: dir.path().join("enrichment.csv"),
        }
        .run()?;

        for suffix in ["total", "A", "T", "C", "G"] {
            assert!(dir.path().join(format!("dataset1_{suffix}.svg")).exists());
            assert!(!dir.path().join(format!("missing_{suffix}.svg")).exists());
        }
        Ok(())
    }
}
