use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use panel_wm::layout::ResizeEdge;
use panel_wm::window::NullHost;
use panel_wm::{PanelId, PanelKind, PanelManager, Point, Viewport};

const EDGES: [ResizeEdge; 8] = [
    ResizeEdge::Left,
    ResizeEdge::Right,
    ResizeEdge::Top,
    ResizeEdge::Bottom,
    ResizeEdge::TopLeft,
    ResizeEdge::TopRight,
    ResizeEdge::BottomLeft,
    ResizeEdge::BottomRight,
];

#[derive(Parser, Debug)]
#[command(
    name = "panel-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Session-heavy benchmark for the panel manager"
)]
struct BenchCli {
    /// Panels open on the canvas while sessions run.
    #[arg(short = 'p', long = "panels", default_value_t = 32)]
    panels: usize,

    /// Number of drag or resize sessions to run.
    #[arg(short = 'n', long = "sessions", default_value_t = 20_000)]
    sessions: u64,

    /// Pointer updates delivered per session before release.
    #[arg(short = 'u', long = "updates", default_value_t = 60)]
    updates: u32,
}

impl BenchCli {
    fn validate(&self) -> Result<(), String> {
        if !(1..=10_000).contains(&self.panels) {
            return Err("panels must be between 1 and 10000".to_string());
        }
        if self.sessions == 0 {
            return Err("sessions must be positive".to_string());
        }
        if !(1..=10_000).contains(&self.updates) {
            return Err("updates must be between 1 and 10000".to_string());
        }
        Ok(())
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    args.validate()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let mut wm = PanelManager::new(NullHost, Viewport::new(1920, 1080));
    let ids: Vec<PanelId> = (0..args.panels)
        .map(|i| wm.open_panel(PanelKind::ALL[i % PanelKind::ALL.len()], format!("bench {i}"), ()))
        .collect();

    let mut noise = Jitter::seeded_from_clock();
    let mut stats = BenchStats::new();
    for session in 0..args.sessions {
        let id = ids[noise.below(ids.len() as u64) as usize];
        let started = Instant::now();
        let ok = if session % 2 == 0 {
            run_drag(&mut wm, id, args.updates, &mut noise)
        } else {
            let edge = EDGES[noise.below(EDGES.len() as u64) as usize];
            run_resize(&mut wm, id, edge, args.updates, &mut noise)
        };
        if session % 97 == 0 {
            let _ = wm.toggle_fullscreen(id);
        }
        stats.record(ok, u64::from(args.updates), started.elapsed());
    }
    stats.mark_completed();

    println!("{}", stats.final_report(&args, wm.len()));
    Ok(())
}

fn run_drag(
    wm: &mut PanelManager<NullHost>,
    id: PanelId,
    updates: u32,
    noise: &mut Jitter,
) -> bool {
    let Some(start) = wm.panel(id).map(|panel| panel.position()) else {
        return false;
    };
    if wm.begin_drag(id, start).is_err() {
        return false;
    }
    let mut pointer = start;
    for _ in 0..updates {
        pointer = Point::new(pointer.x + noise.step(), pointer.y + noise.step());
        let _ = wm.update_drag(id, pointer);
    }
    wm.end_drag(id, pointer).is_ok()
}

fn run_resize(
    wm: &mut PanelManager<NullHost>,
    id: PanelId,
    edge: ResizeEdge,
    updates: u32,
    noise: &mut Jitter,
) -> bool {
    let start = Point::new(0, 0);
    if wm.begin_resize(id, edge, start).is_err() {
        return false;
    }
    let mut pointer = start;
    for _ in 0..updates {
        pointer = Point::new(pointer.x + noise.step(), pointer.y + noise.step());
        let _ = wm.update_resize(id, pointer);
    }
    wm.end_resize(id, pointer).is_ok()
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    sessions: u64,
    rejected: u64,
    updates: u64,
    slowest_session: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            sessions: 0,
            rejected: 0,
            updates: 0,
            slowest_session: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record(&mut self, committed: bool, updates: u64, took: Duration) {
        self.sessions = self.sessions.saturating_add(1);
        if committed {
            self.updates = self.updates.saturating_add(updates);
        } else {
            self.rejected = self.rejected.saturating_add(1);
        }
        if took > self.slowest_session {
            self.slowest_session = took;
        }
    }

    fn final_report(&self, args: &BenchCli, open_panels: usize) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let per_second = |count: u64| {
            if elapsed > 0.0 {
                count as f64 / elapsed
            } else {
                0.0
            }
        };

        indoc::formatdoc!(
            r#"
            Panel bench completed.
            Panels: {open_panels} open | Sessions: {sessions} ({rejected} rejected)
            Duration: {elapsed:.3}s | {sessions_per_sec:.0} sessions/s
            Pointer updates: {updates} total (~{updates_per_sec:.0}/s, {per_session} per session)
            Slowest session: {slowest:.3} ms
            "#,
            sessions = self.sessions,
            rejected = self.rejected,
            sessions_per_sec = per_second(self.sessions),
            updates = self.updates,
            updates_per_sec = per_second(self.updates),
            per_session = args.updates,
            slowest = self.slowest_session.as_secs_f64() * 1_000.0,
        )
    }
}

/// xorshift pointer jitter; quality doesn't matter, only repeatable cost.
struct Jitter {
    state: u64,
}

impl Jitter {
    fn seeded_from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
            ^ 0xA5A5_A5A5_1234_5678;
        Self { state: seed | 1 }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound.max(1)
    }

    /// A pointer step in canvas units, -12..=12.
    fn step(&mut self) -> i32 {
        self.below(25) as i32 - 12
    }
}
