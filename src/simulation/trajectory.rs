//! Optional per-particle trajectory recorder
//!
//! The recorder observes the simulation: it is handed every particle state the
//! engine produces (initial condition, integration steps, wall and collision
//! corrections) and keeps append-only columns per particle. Since corrections
//! happen at different rates per particle, histories end up with different
//! lengths; `table()` pads them to a rectangular table.

use log::warn;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use super::states::{Mode, Particle};

/// Samples recorded for one particle. The y/vy columns stay empty in 1D
#[derive(Debug, Clone, Default)]
pub struct History {
    pub x: Vec<f64>,
    pub vx: Vec<f64>,
    pub y: Vec<f64>,
    pub vy: Vec<f64>,
}

impl History {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Trajectory {
    mode: Mode,
    histories: Vec<History>, // indexed by particle id
}

impl Trajectory {
    /// Start a recording whose first sample is each particle's current state
    pub fn new(mode: Mode, particles: &[Particle]) -> Self {
        let mut trajectory = Self {
            mode,
            histories: vec![History::default(); particles.len()],
        };
        for p in particles {
            trajectory.record(p);
        }
        trajectory
    }

    /// Append the particle's current state to its history
    pub fn record(&mut self, p: &Particle) {
        debug_assert!(p.id < self.histories.len(), "particle {} is not tracked", p.id);
        let Some(h) = self.histories.get_mut(p.id) else {
            warn!("particle {} is not tracked by the recorder, sample dropped", p.id);
            return;
        };
        h.x.push(p.x.x);
        h.vx.push(p.v.x);
        if self.mode == Mode::TwoD {
            h.y.push(p.x.y);
            h.vy.push(p.v.y);
        }
    }

    pub fn history(&self, id: usize) -> Option<&History> {
        self.histories.get(id)
    }

    pub fn histories(&self) -> &[History] {
        &self.histories
    }

    /// Flatten into `{id}_x, {id}_vx[, {id}_y, {id}_vy]` columns padded with `None`
    pub fn table(&self) -> TrajectoryTable {
        let rows = self.histories.iter().map(History::len).max().unwrap_or(0);
        let mut headers = Vec::new();
        let mut columns = Vec::new();

        let pad = |samples: &[f64]| -> Vec<Option<f64>> {
            let mut col: Vec<Option<f64>> = samples.iter().copied().map(Some).collect();
            col.resize(rows, None);
            col
        };

        for (id, h) in self.histories.iter().enumerate() {
            headers.push(format!("{id}_x"));
            columns.push(pad(&h.x));
            headers.push(format!("{id}_vx"));
            columns.push(pad(&h.vx));
            if self.mode == Mode::TwoD {
                headers.push(format!("{id}_y"));
                columns.push(pad(&h.y));
                headers.push(format!("{id}_vy"));
                columns.push(pad(&h.vy));
            }
        }

        TrajectoryTable { headers, columns, rows }
    }
}

/// Rectangular trajectory table, one column per particle quantity
#[derive(Debug, Clone)]
pub struct TrajectoryTable {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
    pub rows: usize,
}

impl TrajectoryTable {
    /// Write as CSV with a header line; missing samples become empty fields
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "{}", self.headers.join(","))?;
        for row in 0..self.rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .map(|col| col[row].map(|v| v.to_string()).unwrap_or_default())
                .collect();
            writeln!(out, "{}", line.join(","))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the CSV to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec2;

    fn particle(id: usize, x: f64, vx: f64) -> Particle {
        Particle::new(id, 1.0, 1.0, 1.0, NVec2::new(x, 0.0), NVec2::new(vx, 0.0)).unwrap()
    }

    #[test]
    fn pads_short_histories_with_missing() {
        let mut a = particle(0, 0.0, 1.0);
        let b = particle(1, 5.0, -1.0);
        let mut traj = Trajectory::new(Mode::OneD, &[a.clone(), b.clone()]);
        a.x.x = 1.0;
        traj.record(&a);
        a.x.x = 2.0;
        traj.record(&a);

        let table = traj.table();
        assert_eq!(table.headers, vec!["0_x", "0_vx", "1_x", "1_vx"]);
        assert_eq!(table.rows, 3);
        assert!(table.columns.iter().all(|c| c.len() == 3));
        assert_eq!(table.columns[0], vec![Some(0.0), Some(1.0), Some(2.0)]);
        assert_eq!(table.columns[2], vec![Some(5.0), None, None]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not tracked")]
    fn recording_an_unknown_particle_is_a_logic_error() {
        let mut traj = Trajectory::new(Mode::OneD, &[particle(0, 0.0, 1.0)]);
        traj.record(&particle(3, 1.0, 1.0));
    }

    #[test]
    fn csv_leaves_missing_cells_empty() {
        let a = particle(0, 0.5, 1.0);
        let mut b = particle(1, 2.0, 0.0);
        let mut traj = Trajectory::new(Mode::OneD, &[a, b.clone()]);
        b.x.x = 2.5;
        traj.record(&b);

        let mut buf = Vec::new();
        traj.table().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0_x,0_vx,1_x,1_vx", "0.5,1,2,0", ",,2.5,0"]);
    }

    #[test]
    fn two_d_records_four_columns() {
        let p = Particle::new(0, 1.0, 1.0, 1.0, NVec2::new(1.0, 2.0), NVec2::new(3.0, 4.0)).unwrap();
        let traj = Trajectory::new(Mode::TwoD, &[p]);
        let h = traj.history(0).unwrap();
        assert_eq!((h.x[0], h.vx[0], h.y[0], h.vy[0]), (1.0, 3.0, 2.0, 4.0));
        assert_eq!(traj.table().headers, vec!["0_x", "0_vx", "0_y", "0_vy"]);
    }
}
