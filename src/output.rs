// src/output.rs
use crate::analytics::ensemble_stats::EnsembleStats;
use crate::analytics::histogram::{component_histogram, pooled_histogram, Histogram};
use crate::error::ChaosResult;
use crate::interactive::render::Renderer;
use crate::sim::sim_engine::{Lorenz63Run, Lorenz96Run};
use crate::sim::trajectory::Trajectory;
use bitflags::bitflags;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputFlags: u32 {
        const NONE       = 0;
        const TRAJECTORY = 1 << 0;
        const HISTOGRAM  = 1 << 1;
        const SPREAD     = 1 << 2;
    }
}

/// One row per (member, time step): `member,t,x0,x1,...`
pub fn write_trajectory_csv(path: &Path, trajectory: &Trajectory) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write!(file, "member,t")?;
    for i in 0..trajectory.dim() {
        write!(file, ",x{}", i)?;
    }
    writeln!(file)?;

    for n in 0..trajectory.members() {
        for (k, t) in trajectory.times().iter().enumerate() {
            write!(file, "{},{}", n, t)?;
            for v in trajectory.state(n, k).iter() {
                write!(file, ",{}", v)?;
            }
            writeln!(file)?;
        }
    }
    file.flush()
}

pub fn write_histogram_csv(path: &Path, histogram: &Histogram) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "bin_start,bin_end,count,density")?;
    let density = histogram.density();
    for (i, count) in histogram.counts.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{}",
            histogram.edges[i],
            histogram.edges[i + 1],
            count,
            density[i]
        )?;
    }
    file.flush()
}

pub fn write_spread_csv(path: &Path, times: &[f64], stats: &EnsembleStats) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "t,spread,rmse,skew,kurt")?;
    for (k, t) in times.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{}",
            t, stats.spread[k], stats.rmse[k], stats.skew[k], stats.kurt[k]
        )?;
    }
    file.flush()
}

/// One row per rank: `rank,x0,x1,...` with the count for each component.
pub fn write_rank_histogram_csv(path: &Path, stats: &EnsembleStats) -> io::Result<()> {
    let dim = stats.ranks.ncols();
    let mut file = BufWriter::new(File::create(path)?);
    write!(file, "rank")?;
    for i in 0..dim {
        write!(file, ",x{}", i)?;
    }
    writeln!(file)?;

    let mut counts = vec![vec![0usize; dim]; stats.rank_bins];
    for row in stats.ranks.outer_iter() {
        for (i, &rank) in row.iter().enumerate() {
            counts[rank][i] += 1;
        }
    }
    for (rank, row) in counts.iter().enumerate() {
        write!(file, "{}", rank)?;
        for count in row {
            write!(file, ",{}", count)?;
        }
        writeln!(file)?;
    }
    file.flush()
}

/// Writes the selected CSV files for every run into one directory.
#[derive(Clone, Debug)]
pub struct CsvRenderer {
    pub dir: PathBuf,
    pub prefix: String,
    pub flags: OutputFlags,
    pub bins: usize,
}

impl CsvRenderer {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, flags: OutputFlags) -> Self {
        CsvRenderer {
            dir: dir.into(),
            prefix: prefix.into(),
            flags,
            bins: 30,
        }
    }

    fn path(&self, system: &str, kind: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}.csv", self.prefix, system, kind))
    }
}

impl Renderer for CsvRenderer {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let trajectory = &run.trajectory;

        if self.flags.contains(OutputFlags::TRAJECTORY) {
            write_trajectory_csv(&self.path("l63", "trajectory"), trajectory)?;
        }
        if self.flags.contains(OutputFlags::HISTOGRAM) {
            for (i, axis) in ["x", "y", "z"].iter().enumerate() {
                let histogram = component_histogram(trajectory, i, self.bins)?;
                write_histogram_csv(&self.path("l63", &format!("hist_{}", axis)), &histogram)?;
            }
        }
        if self.flags.contains(OutputFlags::SPREAD) {
            let stats = EnsembleStats::from_trajectory(trajectory)?;
            write_spread_csv(&self.path("l63", "spread"), trajectory.times(), &stats)?;
            write_rank_histogram_csv(&self.path("l63", "rank"), &stats)?;
        }
        debug!(dir = %self.dir.display(), flags = ?self.flags, "wrote lorenz-63 csv output");
        Ok(())
    }

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let trajectory = &run.trajectory;

        if self.flags.contains(OutputFlags::TRAJECTORY) {
            write_trajectory_csv(&self.path("l96", "trajectory"), trajectory)?;
        }
        if self.flags.contains(OutputFlags::HISTOGRAM) {
            let histogram = pooled_histogram(trajectory, self.bins)?;
            write_histogram_csv(&self.path("l96", "hist"), &histogram)?;
        }
        debug!(dir = %self.dir.display(), flags = ?self.flags, "wrote lorenz-96 csv output");
        Ok(())
    }
}
