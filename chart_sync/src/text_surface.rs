//! Terminal candlestick surface.
//!
//! One column per bar, most recent bars on the right, as many as fit the width
//! after the price axis. Each row is one price band; a cell shows the body glyph
//! where the band overlaps `open..close`, the wick glyph where it overlaps
//! `low..high`, and blank otherwise.

use std::fmt::Write as _;

use market_data_gateway::Bar;

use crate::surface::{ChartSurface, SurfaceError};

const AXIS_WIDTH: usize = 11;
const BULL_BODY: char = '┃';
const BEAR_BODY: char = '█';
const WICK: char = '│';
const VOID: char = ' ';

/// Where the text surface is mounted: a fixed number of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPane {
    pub height: usize,
}

impl TextPane {
    pub fn new(height: usize) -> Self {
        Self { height }
    }
}

#[derive(Debug)]
pub struct TextCandles {
    height: usize,
    width: u32,
    bars: Vec<Bar>,
    frame: String,
    destroyed: bool,
}

impl TextCandles {
    /// The last rendered frame, one line per row.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn columns(&self) -> usize {
        (self.width as usize).saturating_sub(AXIS_WIDTH)
    }

    fn render(&mut self) {
        self.frame.clear();
        let cols = self.columns();
        if self.bars.is_empty() || cols == 0 || self.height == 0 {
            return;
        }
        let visible = &self.bars[self.bars.len().saturating_sub(cols)..];

        let max = visible.iter().fold(f64::NEG_INFINITY, |m, b| m.max(b.high));
        let min = visible.iter().fold(f64::INFINITY, |m, b| m.min(b.low));
        let rows = self.height;
        let scale = |price: f64| -> usize {
            if max <= min {
                return rows / 2;
            }
            let y = (price - min) / (max - min) * (rows - 1) as f64;
            (y.round().max(0.0) as usize).min(rows - 1)
        };

        for row in (0..rows).rev() {
            let label = if row == rows - 1 {
                format!("{max:>10.2}")
            } else if row == 0 {
                format!("{min:>10.2}")
            } else {
                " ".repeat(10)
            };
            let _ = write!(self.frame, "{label}┤");

            for bar in visible {
                let high = scale(bar.high);
                let low = scale(bar.low);
                let body_top = scale(bar.open.max(bar.close));
                let body_bottom = scale(bar.open.min(bar.close));
                let glyph = if (body_bottom..=body_top).contains(&row) {
                    if bar.is_bullish() { BULL_BODY } else { BEAR_BODY }
                } else if (low..=high).contains(&row) {
                    WICK
                } else {
                    VOID
                };
                self.frame.push(glyph);
            }
            self.frame.push('\n');
        }
    }
}

impl ChartSurface for TextCandles {
    type Container = TextPane;

    fn create(container: &mut TextPane, width: u32) -> Result<Self, SurfaceError> {
        if container.height == 0 {
            return Err(SurfaceError::Create("text pane has no rows".into()));
        }
        Ok(Self {
            height: container.height,
            width,
            bars: Vec::new(),
            frame: String::new(),
            destroyed: false,
        })
    }

    fn set_series(&mut self, bars: &[Bar]) {
        self.bars = bars.to_vec();
        self.render();
    }

    fn resize(&mut self, width: u32) {
        self.width = width;
        self.render();
    }

    fn destroy(&mut self) {
        self.bars = Vec::new();
        self.frame = String::new();
        self.destroyed = true;
    }
}
