//! Live breadcrumb recording.

use crate::geo::Coordinate;

/// Append-only trail of received positions while tracking is enabled.
#[derive(Debug, Clone)]
pub struct TrackRecorder {
    enabled: bool,
    breadcrumb: Vec<Coordinate>,
}

impl Default for TrackRecorder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TrackRecorder {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            breadcrumb: Vec::new(),
        }
    }

    /// Append a sample; dropped when tracking is disabled.
    pub fn on_sample(&mut self, coord: Coordinate) -> bool {
        if self.enabled {
            self.breadcrumb.push(coord);
        }
        self.enabled
    }

    /// Set the tracking flag. Any actual change of the flag, in either
    /// direction, discards the recorded history.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.breadcrumb.clear();
            self.enabled = enabled;
        }
    }

    /// Flip the tracking flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn clear(&mut self) {
        self.breadcrumb.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn breadcrumb(&self) -> &[Coordinate] {
        &self.breadcrumb
    }
}
