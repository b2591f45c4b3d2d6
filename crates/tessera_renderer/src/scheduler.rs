//! Lock-free tile scheduling across a fixed pool of worker threads.
//!
//! The framebuffer is split up front into one exclusive region per tile.
//! Workers claim tiles by bumping a shared atomic cursor; the index they
//! get back is theirs alone, so they take that tile's region and write
//! its pixels without any further synchronization.

use crate::error::{RenderError, RenderResult};
use crate::renderer::{render_tile, Framebuffer, Rgb};
use crate::sampler::Pcg32;
use crate::tile::{generate_tiles, Tile};
use crate::{Camera, RenderConfig, Scene};
use log::{debug, warn};
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Upper bound on worker threads, automatic or explicit.
pub const MAX_THREADS: usize = 64;

/// How many worker threads a render uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadCount {
    /// All hardware threads but one, capped at [`MAX_THREADS`].
    #[default]
    Auto,
    /// Exactly this many workers.
    Fixed(usize),
}

impl ThreadCount {
    /// Resolve to a concrete worker count.
    pub fn resolve(self) -> RenderResult<usize> {
        match self {
            ThreadCount::Fixed(requested) if requested == 0 || requested > MAX_THREADS => {
                Err(RenderError::ThreadCountOutOfRange {
                    requested,
                    max: MAX_THREADS,
                })
            }
            ThreadCount::Fixed(requested) => Ok(requested),
            ThreadCount::Auto => {
                let available = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                auto_thread_count(available)
            }
        }
    }
}

/// Leave one hardware thread for the rest of the system.
fn auto_thread_count(available: usize) -> RenderResult<usize> {
    let usable = available.saturating_sub(1);
    if usable < 2 {
        return Err(RenderError::UnusableThreadCount { usable });
    }
    if usable > MAX_THREADS {
        warn!(
            "{} hardware threads available, limiting workers to {}",
            available, MAX_THREADS
        );
        return Ok(MAX_THREADS);
    }
    Ok(usable)
}

/// The pixels of one tile, borrowed exclusively from the framebuffer.
pub struct TileRegion<'a> {
    tile: Tile,
    rows: Vec<&'a mut [Rgb]>,
}

impl<'a> TileRegion<'a> {
    fn new(tile: Tile) -> Self {
        Self {
            tile,
            rows: Vec::with_capacity(tile.height() as usize),
        }
    }

    /// The tile this region covers.
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Write the pixel at image coordinates (x, y), which must lie in the tile.
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgb) {
        debug_assert!(self.tile.contains(x, y));
        let row = (y - self.tile.y_start) as usize;
        let col = (x - self.tile.x_start) as usize;
        self.rows[row][col] = pixel;
    }
}

/// Split the framebuffer into one exclusive region per tile.
///
/// `tiles` must be in the row-major order produced by `generate_tiles`,
/// so the tiles crossing any image row appear left to right.
fn split_regions<'a>(pixels: &'a mut [Rgb], width: u32, tiles: &[Tile]) -> Vec<TileRegion<'a>> {
    let mut regions: Vec<TileRegion<'a>> = tiles.iter().map(|&tile| TileRegion::new(tile)).collect();

    // Regions of the tile row covering the current image row
    let mut band = 0..0;

    for (y, mut row) in pixels.chunks_mut(width as usize).enumerate() {
        let y = y as u32;
        if band.is_empty() || regions[band.start].tile.y_end <= y {
            let start = band.end;
            let y_end = regions[start].tile.y_end;
            let len = regions[start..]
                .iter()
                .take_while(|region| region.tile.y_end == y_end)
                .count();
            band = start..start + len;
        }

        let mut x = 0;
        for region in &mut regions[band.clone()] {
            debug_assert!(region.tile.y_start <= y && y < region.tile.y_end);
            debug_assert_eq!(region.tile.x_start, x);
            let (segment, rest) = std::mem::take(&mut row).split_at_mut(region.tile.width() as usize);
            region.rows.push(segment);
            row = rest;
            x = region.tile.x_end;
        }
    }

    regions
}

/// Hands out tiles to workers and owns everything they share.
///
/// Scene, camera and config are read-only for the whole render. The
/// cursor is the only shared mutable state; each region slot is taken
/// exactly once, by the worker whose fetch-add returned its index.
pub struct TileScheduler<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    config: &'a RenderConfig,
    tiles: Vec<Tile>,
    cursor: AtomicUsize,
    slots: Vec<Mutex<Option<TileRegion<'a>>>>,
}

impl<'a> TileScheduler<'a> {
    /// Partition the framebuffer into tiles ready to be claimed.
    pub fn new(
        framebuffer: &'a mut Framebuffer,
        scene: &'a Scene,
        camera: &'a Camera,
        config: &'a RenderConfig,
    ) -> Self {
        let width = framebuffer.width;
        let height = framebuffer.height;
        let tiles = generate_tiles(width, height, config.tile_width, config.tile_height);
        let slots = split_regions(framebuffer.pixels_mut(), width, &tiles)
            .into_iter()
            .map(|region| Mutex::new(Some(region)))
            .collect();

        Self {
            scene,
            camera,
            config,
            tiles,
            cursor: AtomicUsize::new(0),
            slots,
        }
    }

    /// Number of tiles in this render.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Claim the next unrendered tile, or `None` once all are handed out.
    pub fn claim(&self) -> Option<TileRegion<'a>> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let slot = self.slots.get(index)?;
        // Uncontended: no other worker can have received this index.
        slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Render every tile on a pool of `threads` workers and wait for them.
    pub fn run(&self, threads: usize) -> RenderResult<()> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("tessera-worker-{}", index))
            .build()?;

        pool.scope(|scope| {
            for worker in 0..threads {
                scope.spawn(move |_| self.work(worker));
            }
        });

        Ok(())
    }

    /// Worker loop: seed a private sampler, then render tiles until none remain.
    fn work(&self, worker: usize) {
        let mut rng = match self.config.seed {
            Some(seed) => {
                debug!("Worker {} using seed {} stream {}", worker, seed, worker);
                Pcg32::new(seed, worker as u64)
            }
            None => {
                debug!("Worker {} seeded from the clock", worker);
                Pcg32::from_time()
            }
        };

        let mut rendered = 0usize;
        while let Some(mut region) = self.claim() {
            render_tile(&mut region, self.camera, self.scene, self.config, &mut rng);
            rendered += 1;
        }

        debug!("Worker {} finished after {} tile(s)", worker, rendered);
    }
}
