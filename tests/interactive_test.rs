// tests/interactive_test.rs
use lorenz_chaos::error::ChaosResult;
use lorenz_chaos::interactive::{lorenz63_surface, lorenz96_surface, Renderer, SummaryRenderer};
use lorenz_chaos::output::{CsvRenderer, OutputFlags};
use lorenz_chaos::sim::{Lorenz63Config, Lorenz63Run, Lorenz96Config, Lorenz96Run};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Default)]
struct Recorded {
    l63: Vec<(f64, usize)>,
    l96: Vec<(usize, f64)>,
}

struct RecordingRenderer(Rc<RefCell<Recorded>>);

impl Renderer for RecordingRenderer {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()> {
        self.0
            .borrow_mut()
            .l63
            .push((run.config.params.rho, run.trajectory.members()));
        Ok(())
    }

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()> {
        self.0
            .borrow_mut()
            .l96
            .push((run.config.params.m, run.config.params.forcing));
        Ok(())
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lorenz-chaos-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn short_l63() -> Lorenz63Config {
    Lorenz63Config {
        ensemble_size: 3,
        t_end: 0.2,
        ..Default::default()
    }
}

#[test]
fn test_slider_change_clamps_and_renders_once() {
    let record = Rc::new(RefCell::new(Recorded::default()));
    let mut surface = lorenz63_surface(short_l63(), RecordingRenderer(Rc::clone(&record)));

    let run = surface.set("rho", 99.0).unwrap().unwrap();
    assert_eq!(run.config.params.rho, 50.0);
    assert_eq!(record.borrow().l63, vec![(50.0, 3)]);

    let run = surface.set("N", 4.6).unwrap().unwrap();
    assert_eq!(run.trajectory.members(), 5);
    assert_eq!(record.borrow().l63.len(), 2);
}

#[test]
fn test_unknown_slider_does_not_render() {
    let record = Rc::new(RefCell::new(Recorded::default()));
    let mut surface = lorenz96_surface(
        Lorenz96Config {
            t_end: 0.1,
            ..Default::default()
        },
        RecordingRenderer(Rc::clone(&record)),
    );

    assert!(surface.set("forcing", 3.0).is_err());
    assert!(record.borrow().l96.is_empty());

    let run = surface.update(&[("m", 2.0), ("Force", 3.5)]).unwrap().unwrap();
    assert_eq!(run.trajectory.dim(), 4);
    assert_eq!(record.borrow().l96, vec![(4, 3.5)]);
}

#[test]
fn test_csv_renderer_writes_selected_files() {
    let dir = scratch_dir("csv");
    let renderer = CsvRenderer::new(
        &dir,
        "run",
        OutputFlags::TRAJECTORY | OutputFlags::HISTOGRAM | OutputFlags::SPREAD,
    );
    let mut surface = lorenz63_surface(short_l63(), (renderer, SummaryRenderer::default()));
    let run = surface.refresh().unwrap().unwrap();

    let trajectory = fs::read_to_string(dir.join("run_l63_trajectory.csv")).unwrap();
    let mut lines = trajectory.lines();
    assert_eq!(lines.next(), Some("member,t,x0,x1,x2"));
    assert_eq!(lines.count(), run.trajectory.members() * run.trajectory.steps());

    for axis in ["x", "y", "z"] {
        let hist = fs::read_to_string(dir.join(format!("run_l63_hist_{}.csv", axis))).unwrap();
        assert!(hist.starts_with("bin_start,bin_end,count,density"));
        assert_eq!(hist.lines().count(), 31);
    }

    let spread = fs::read_to_string(dir.join("run_l63_spread.csv")).unwrap();
    assert!(spread.starts_with("t,spread,rmse"));
    assert_eq!(spread.lines().count(), run.trajectory.steps() + 1);

    let ranks = fs::read_to_string(dir.join("run_l63_rank.csv")).unwrap();
    assert!(ranks.starts_with("rank,x0,x1,x2"));
    assert_eq!(ranks.lines().count(), run.trajectory.members() + 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_csv_renderer_respects_flags() {
    let dir = scratch_dir("flags");
    let mut renderer = CsvRenderer::new(&dir, "only", OutputFlags::HISTOGRAM);
    let mut surface = lorenz96_surface(
        Lorenz96Config {
            t_end: 0.5,
            ..Default::default()
        },
        CsvRenderer::new(&dir, "none", OutputFlags::NONE),
    );
    let run = surface.refresh().unwrap().unwrap();
    renderer.render_lorenz96(&run).unwrap();

    assert!(dir.join("only_l96_hist.csv").exists());
    assert!(!dir.join("only_l96_trajectory.csv").exists());
    assert!(!dir.join("none_l96_hist.csv").exists());

    let _ = fs::remove_dir_all(&dir);
}
