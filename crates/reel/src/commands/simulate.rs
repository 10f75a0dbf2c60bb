use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use colored::Colorize;

use crate::carousel::{Authority, Carousel, Direction};
use crate::config::Config;
use crate::deck::Deck;
use crate::frame_loop::FrameLoop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub direction: Direction,
    pub at_tick: u64,
}

impl FromStr for ScheduledStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, tick) = s
            .split_once('@')
            .ok_or_else(|| format!("Invalid step: {s}. Expected DIRECTION@TICK, e.g. forward@120."))?;
        let direction = direction.parse::<Direction>()?;
        let at_tick = tick
            .parse::<u64>()
            .map_err(|_| format!("Invalid step tick: {tick}. Must be a whole number."))?;
        Ok(Self { direction, at_tick })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSpan {
    pub start: u64,
    pub end: u64,
}

impl HoverSpan {
    fn contains(&self, tick: u64) -> bool {
        (self.start..self.end).contains(&tick)
    }
}

impl FromStr for HoverSpan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid hover span: {s}. Expected START-END, e.g. 100-300.");
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = start.trim().parse::<u64>().map_err(|_| invalid())?;
        let end = end.trim().parse::<u64>().map_err(|_| invalid())?;
        if end < start {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub tick: u64,
    pub at: Duration,
    pub offset: f64,
    pub paused: bool,
    pub stepping: bool,
}

/// Drive a mounted carousel with `ticks` fake frames, applying hover and
/// steps before the tick they are scheduled for. Samples are taken after the
/// tick whenever `tick % every == 0`, plus once after the final tick.
pub fn simulate<T: 'static>(
    carousel: Carousel<T>,
    ticks: u64,
    every: u64,
    steps: &[ScheduledStep],
    hover: Option<HoverSpan>,
) -> Vec<Sample> {
    let mut frame_loop = FrameLoop::default();
    let mounted = carousel.mount(&frame_loop);
    let every = every.max(1);
    let mut samples = Vec::new();

    for tick in 0..ticks {
        let hovered = hover.is_some_and(|h| h.contains(tick));
        let now = frame_loop.now();
        mounted.with_mut(|c| {
            c.set_hovered(hovered);
            for step in steps.iter().filter(|s| s.at_tick == tick) {
                c.step(step.direction, now);
            }
        });

        frame_loop.tick();

        let last = tick + 1 == ticks;
        if tick % every == 0 || last {
            samples.push(mounted.with(|c| Sample {
                tick,
                at: frame_loop.now(),
                offset: c.offset(),
                paused: c.is_paused(),
                stepping: matches!(c.authority(), Authority::Step { .. }),
            }));
        }
    }
    samples
}

pub fn run(
    file: Option<PathBuf>,
    ticks: u64,
    every: u64,
    steps: Vec<ScheduledStep>,
    hover: Option<HoverSpan>,
) -> anyhow::Result<()> {
    let deck = match &file {
        Some(path) => Deck::load(path)?,
        None => Deck::sample(),
    };
    let layout = Config::load_or_default().layout();
    let carousel = Carousel::try_new(deck.testimonials, layout)?;
    let loop_width = carousel.loop_width();

    eprintln!(
        "Simulating {} ticks (loop width {loop_width}px, stride {}px, velocity {}px/tick)",
        ticks,
        layout.stride(),
        layout.velocity,
    );
    println!(
        "{}",
        format!("{:>8} {:>10} {:>10}  state", "tick", "time_ms", "offset").bold()
    );
    for sample in simulate(carousel, ticks, every, &steps, hover) {
        let state = if sample.stepping {
            "stepping".yellow()
        } else if sample.paused {
            "paused".cyan()
        } else {
            "playing".green()
        };
        println!(
            "{:>8} {:>10} {:>10.2}  {state}",
            sample.tick,
            sample.at.as_millis(),
            sample.offset,
        );
    }
    Ok(())
}
