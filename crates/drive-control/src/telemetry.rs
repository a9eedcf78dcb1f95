// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Tick Records and Telemetry Window
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Per-tick records in the logger schema and a fixed-size rolling window
//! for plotting consumers.

use drive_types::modes::{ControlMode, FaultKind};
use drive_types::state::Phases;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub const CSV_HEADER: &str = "Time,Va,Vb,Vc,Ia,Ib,Ic,Speed,Torque,ControlMode,Fault";

/// Everything one tick publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub time: f64,
    pub voltages: Phases,
    pub currents: Phases,
    pub speed: f64,
    pub torque: f64,
    pub control_mode: ControlMode,
    pub fault: FaultKind,
    pub motor_temperature: f64,
    pub inverter_temperature: f64,
    /// Switching plus conduction loss [W].
    pub power_loss: f64,
}

impl TickRecord {
    /// `%.3f` time, `%.2f` quantities, operator labels.
    pub fn to_csv_row(&self) -> String {
        let v = &self.voltages;
        let i = &self.currents;
        format!(
            "{:.3},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{}",
            self.time,
            v[0],
            v[1],
            v[2],
            i[0],
            i[1],
            i[2],
            self.speed,
            self.torque,
            self.control_mode.label(),
            self.fault.label()
        )
    }
}

/// A fixed-size circular buffer for a single channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularChannel {
    data: Vec<f64>,
    head: usize,
    count: usize,
}

impl CircularChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn push(&mut self, value: f64) {
        let cap = self.capacity();
        self.data[self.head] = value;
        self.head = (self.head + 1) % cap;
        if self.count < cap {
            self.count += 1;
        }
    }

    /// Oldest to newest.
    pub fn view(&self) -> Vec<f64> {
        let cap = self.capacity();
        let mut out = Vec::with_capacity(self.count);
        if self.count < cap {
            out.extend_from_slice(&self.data[..self.count]);
        } else {
            out.extend_from_slice(&self.data[self.head..]);
            out.extend_from_slice(&self.data[..self.head]);
        }
        out
    }

    pub fn latest(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let cap = self.capacity();
        Some(self.data[(self.head + cap - 1) % cap])
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

/// Column order of [`TelemetryWindow::to_array`].
pub const WINDOW_CHANNELS: [&str; 9] = ["Time", "Va", "Vb", "Vc", "Ia", "Ib", "Ic", "Speed", "Torque"];

/// Rolling window over the most recent ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryWindow {
    channels: [CircularChannel; 9],
}

impl TelemetryWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: std::array::from_fn(|_| CircularChannel::new(capacity)),
        }
    }

    pub fn record(&mut self, tick: &TickRecord) {
        let values = [
            tick.time,
            tick.voltages[0],
            tick.voltages[1],
            tick.voltages[2],
            tick.currents[0],
            tick.currents[1],
            tick.currents[2],
            tick.speed,
            tick.torque,
        ];
        for (ch, v) in self.channels.iter_mut().zip(values) {
            ch.push(v);
        }
    }

    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    pub fn channel(&self, name: &str) -> Option<&CircularChannel> {
        WINDOW_CHANNELS
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|idx| &self.channels[idx])
    }

    /// Rows are ticks (oldest first), columns follow [`WINDOW_CHANNELS`].
    pub fn to_array(&self) -> Array2<f64> {
        let views: Vec<Vec<f64>> = self.channels.iter().map(CircularChannel::view).collect();
        Array2::from_shape_fn((self.len(), views.len()), |(row, col)| views[col][row])
    }

    pub fn clear(&mut self) {
        self.channels.iter_mut().for_each(CircularChannel::clear);
    }
}
