//! Rendering-surface capability and its scoped owner.
//!
//! A [`ChartSurface`] is an opaque sink for an OHLC series. It keeps no history
//! of its own: every change re-supplies the complete bar sequence. [`ChartView`]
//! owns at most one surface, creates it lazily on the first non-empty series,
//! forwards container resizes, and destroys it exactly once when dropped.

use market_data_gateway::Bar;
use thiserror::Error;
use tracing::debug;

use crate::state::Snapshot;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to create chart surface: {0}")]
    Create(String),
}

pub trait ChartSurface: Sized {
    /// Whatever the surface is mounted into.
    type Container;

    fn create(container: &mut Self::Container, width: u32) -> Result<Self, SurfaceError>;

    /// Replaces the displayed series with `bars`.
    fn set_series(&mut self, bars: &[Bar]);

    /// Re-lays out at `width`. Independent of data changes.
    fn resize(&mut self, width: u32);

    /// Releases the surface's resources. Called once, by [`ChartView`].
    fn destroy(&mut self);
}

pub struct ChartView<S: ChartSurface> {
    container: S::Container,
    width: u32,
    surface: Option<S>,
    applied_revision: Option<u64>,
}

impl<S: ChartSurface> ChartView<S> {
    pub fn new(container: S::Container, width: u32) -> Self {
        Self {
            container,
            width,
            surface: None,
            applied_revision: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn container(&self) -> &S::Container {
        &self.container
    }

    /// Brings the surface up to date with `snapshot`.
    ///
    /// Does nothing until the first non-empty series arrives; after that, every
    /// new revision is pushed in full.
    pub fn sync(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SurfaceError> {
        if self.applied_revision == Some(snapshot.revision) {
            return Ok(());
        }
        match self.surface.as_mut() {
            Some(surface) => surface.set_series(snapshot.bars),
            None if snapshot.bars.is_empty() => return Ok(()),
            None => {
                let mut surface = S::create(&mut self.container, self.width)?;
                debug!(width = self.width, bars = snapshot.bars.len(), "chart surface created");
                surface.set_series(snapshot.bars);
                self.surface = Some(surface);
            }
        }
        self.applied_revision = Some(snapshot.revision);
        Ok(())
    }

    /// Container width changed; re-layout without touching the data.
    pub fn on_container_resize(&mut self, width: u32) {
        if width == self.width {
            return;
        }
        self.width = width;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width);
        }
    }
}

impl<S: ChartSurface> Drop for ChartView<S> {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
            debug!("chart surface destroyed");
        }
    }
}
