//! One glyph per outcome, wrapped at a fixed width with a running percentage.

use super::{Report, Summary};
use crate::config::{ReporterConfig, DEFAULT_REPORTER_WIDTH};
use colored::{Color, Colorize};
use std::io::{self, Write};

#[derive(Debug)]
pub struct DotReporter<W: Write> {
    out: W,
    width: usize,
    colors: bool,
    /// Glyphs written on the current run, padding included
    counter: usize,
    current: usize,
    total: usize,
    summary: Summary,
    notable: Vec<Report>,
}

impl<W: Write> DotReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: DEFAULT_REPORTER_WIDTH,
            colors: true,
            counter: 0,
            current: 0,
            total: 0,
            summary: Summary::default(),
            notable: Vec::new(),
        }
    }

    pub fn from_config(out: W, config: &ReporterConfig) -> Self {
        Self::new(out)
            .with_width(config.width)
            .with_colors(config.colors)
    }

    /// Glyphs per line. Zero is treated as one.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Start a run of `total` specs.
    pub fn begin(&mut self, total: usize) -> io::Result<()> {
        self.total = total;
        writeln!(self.out)
    }

    pub fn report(&mut self, report: Report) -> io::Result<()> {
        self.current += 1;
        self.summary.record(report.outcome);
        self.write_glyph(report.outcome.glyph(), report.outcome.color())?;
        if report.outcome.is_notable() {
            self.notable.push(report);
        }
        Ok(())
    }

    /// Pad the last progress line, list notable reports and the summary.
    pub fn end(&mut self) -> io::Result<Summary> {
        loop {
            self.write_glyph(" ", None)?;
            if self.counter % self.width == 0 {
                break;
            }
        }

        for report in std::mem::take(&mut self.notable) {
            self.write_report(&report)?;
        }

        write!(self.out, "\n\n")?;
        let line = self.summary.to_string();
        let color = if self.summary.is_success() {
            Color::Green
        } else {
            Color::Red
        };
        writeln!(self.out, "{}", self.paint(&line, Some(color)))?;
        self.out.flush()?;
        Ok(self.summary)
    }

    fn write_glyph(&mut self, glyph: &str, color: Option<Color>) -> io::Result<()> {
        let painted = self.paint(glyph, color);
        write!(self.out, "{painted}")?;
        self.counter += 1;
        if self.counter % self.width == 0 {
            writeln!(self.out, " {}%", self.percent())?;
        }
        Ok(())
    }

    fn write_report(&mut self, report: &Report) -> io::Result<()> {
        let label = format!("[{}]", report.outcome.to_string().to_uppercase());
        let label = self.paint(&label, report.outcome.color());
        write!(self.out, "\n{label} {}", report.description)?;
        if let Some(message) = &report.message {
            for line in message.lines() {
                write!(self.out, "\n    {line}")?;
            }
        }
        writeln!(self.out)
    }

    fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.current * 100 / self.total
        }
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.colors => text.color(color).to_string(),
            _ => text.to_string(),
        }
    }
}
