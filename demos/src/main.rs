//! Terminal demo: generate a maze, plan through it, then shift walls around
//! while a walker follows the route.
//!
//! Usage: `isthmus-demo [seed] [width] [height]`. Set `RUST_LOG=debug` to
//! see the planner at work.

use std::collections::HashSet;
use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use isthmus_core::Point;
use isthmus_hpa::{Planner, RouteMode, WalkStatus, Walker};
use isthmus_maze::{Maze, MazeGen, MazeGenConfig, MutationQueue, Terrain};
use rand::SeedableRng;
use rand::rngs::StdRng;

const MAX_TICKS: u64 = 500;
const MUTATION_EVERY: u64 = 4;
const WARNING_TICKS: u64 = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(7);
    let width: i32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(31);
    let height: i32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(15);

    let config = MazeGenConfig {
        extra_openings: 6,
        ..MazeGenConfig::default()
    };
    let mut generator = MazeGen::new(StdRng::seed_from_u64(seed), config);
    let mut maze = generator.generate(width, height);
    let mut rng = generator.rng;

    let start = maze.start().ok_or("generated maze has no start")?;
    let goal = maze.goal().ok_or("generated maze has no goal")?;

    let mut planner = Planner::default();
    let route = planner.compute_path(&maze, start, goal)?;
    let mode = match route.mode {
        RouteMode::Hierarchical => "hierarchical".to_string(),
        RouteMode::Fallback(reason) => format!("fallback ({reason})"),
    };
    let cuts = planner.decomposition().map_or(0, |d| d.cuts().len());
    let regions = planner
        .decomposition()
        .map_or(0, |d| d.partition().region_count());
    let links = planner.decomposition().map_or(0, |d| {
        let adj = d.partition().region_adjacency();
        adj.values().map(|n| n.len()).sum::<usize>() / 2
    });

    let mut out = io::stdout();
    render(&mut out, &maze, &planner, &route.path, start, None)?;
    writeln!(
        out,
        "legend: . floor ({}) T trap ({}) P powerup ({}) + cut vertex * route ! unstable @ walker",
        Terrain::Open.weight(),
        Terrain::Trap.weight(),
        Terrain::Powerup.weight(),
    )?;
    writeln!(
        out,
        "seed {seed}: {cuts} cut vertices, {regions} regions ({links} linked pairs), \
         {mode} route of {} steps, cost {:.2}, {} nodes explored",
        route.steps(),
        route.cost(&maze, planner.config()),
        route.stats.explored,
    )?;

    let mut queue = MutationQueue::new(WARNING_TICKS);
    let mut walker = Walker::new(start, goal);
    let mut tick = 0;
    while tick < MAX_TICKS {
        tick += 1;
        if tick % MUTATION_EVERY == 0 {
            queue.schedule_random(&maze, &mut rng, tick);
        }
        let changed = queue.advance_except(tick, &mut maze, &[walker.position()]);
        if changed > 0 {
            log::info!("tick {tick}: {changed} wall edits, maze v{}", maze.version());
        }
        if walker.step(&mut planner, &maze) == WalkStatus::Arrived {
            break;
        }
    }

    let remaining = walker.remaining().to_vec();
    render(&mut out, &maze, &planner, &remaining, walker.position(), Some(&queue))?;
    writeln!(
        out,
        "after {tick} ticks: {:?} at {}, {} moves, cost {:.2}, {} plans, {} analyses",
        walker.status(),
        walker.position(),
        walker.history().len() - 1,
        walker.total_cost(),
        walker.replans(),
        planner.analyses(),
    )?;
    out.flush()?;
    Ok(())
}

fn render(
    out: &mut impl Write,
    maze: &Maze,
    planner: &Planner,
    path: &[Point],
    mover: Point,
    queue: Option<&MutationQueue>,
) -> io::Result<()> {
    let on_path: HashSet<Point> = path.iter().copied().collect();
    let decomposition = planner
        .decomposition()
        .filter(|d| !d.is_stale(maze.version()));

    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let p = Point::new(x, y);
            let terrain = maze.at(p).unwrap_or(Terrain::Wall);
            let (ch, color) = if p == mover {
                ('@', Color::Yellow)
            } else if queue.is_some_and(|q| q.is_unstable(p)) {
                ('!', Color::Red)
            } else if matches!(terrain, Terrain::Start | Terrain::Goal) {
                (terrain.glyph(), Color::White)
            } else if decomposition.is_some_and(|d| d.cuts().contains(p)) {
                ('+', Color::Magenta)
            } else if on_path.contains(&p) {
                ('*', Color::Cyan)
            } else {
                let color = match terrain {
                    Terrain::Wall => Color::DarkGrey,
                    Terrain::Trap => Color::DarkRed,
                    Terrain::Powerup => Color::Green,
                    _ => Color::Grey,
                };
                (terrain.glyph(), color)
            };
            queue!(out, SetForegroundColor(color), Print(ch))?;
        }
        queue!(out, ResetColor, Print('\n'))?;
    }
    Ok(())
}
