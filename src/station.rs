//! Polling-loop owner: readout, estimator state and report assembly.

use crate::{
    driver::SensorDriver,
    orientation::{ComplementaryFilter, FilterState, Orientation},
    readout::{Readings, SensorReadout, SensorStatus},
    telemetry::TelemetryReport,
    units::{BaroSample, EnvSample, MagSample, MotionSample},
};
use embedded_hal::delay::DelayNs;

/// Drives one telemetry cycle at a time.
///
/// The station is the single owner of the [`FilterState`]; callers that share
/// it across execution contexts must serialize access to the whole station.
pub struct TelemetryStation<B, E, M, Q, D> {
    readout: SensorReadout<B, E, M, Q, D>,
    filter: ComplementaryFilter,
    state: FilterState,
    orientation: Orientation,
}

impl<B, E, M, Q, D> TelemetryStation<B, E, M, Q, D>
where
    B: SensorDriver<Sample = BaroSample>,
    E: SensorDriver<Sample = EnvSample>,
    M: SensorDriver<Sample = MotionSample>,
    Q: SensorDriver<Sample = MagSample>,
    D: DelayNs,
{
    pub fn new(readout: SensorReadout<B, E, M, Q, D>) -> Self {
        Self::with_filter(readout, ComplementaryFilter::new())
    }

    pub fn with_filter(readout: SensorReadout<B, E, M, Q, D>, filter: ComplementaryFilter) -> Self {
        Self {
            readout,
            filter,
            state: FilterState::default(),
            orientation: Orientation::unavailable(),
        }
    }

    pub fn begin(&mut self) -> SensorStatus {
        self.readout.begin()
    }

    /// Read every sensor, advance the estimator by `dt` seconds and assemble
    /// the report.
    ///
    /// A cycle without a valid inertial reading leaves the filter state alone
    /// and reports an all-NaN orientation.
    pub fn cycle(&mut self, dt: f32) -> TelemetryReport {
        let readings = self.readout.read_all();
        self.orientation = self.estimate(&readings, dt);
        TelemetryReport::assemble(&readings, &self.orientation)
    }

    fn estimate(&mut self, readings: &Readings, dt: f32) -> Orientation {
        if !readings.inertial.is_valid() {
            return Orientation::unavailable();
        }
        self.filter
            .update_readings(&mut self.state, &readings.inertial, &readings.magnetic, dt)
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Orientation of the last cycle, all NaN before the first one.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn readout(&self) -> &SensorReadout<B, E, M, Q, D> {
        &self.readout
    }

    pub fn into_readout(self) -> SensorReadout<B, E, M, Q, D> {
        self.readout
    }
}
