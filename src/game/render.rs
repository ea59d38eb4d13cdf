//! Formation Rendering
//!
//! Dirty-rectangle drawing onto a text surface. A full erase-then-draw
//! pass only runs when the formation geometry changed; explosions are
//! redrawn every frame so their animation never stalls behind the march.
//!
//! Rows or columns outside the playfield are skipped, never written.

use crate::core::grid::{Cell, CellRect};
use crate::game::config::SwarmConfig;
use crate::game::host::RenderSurface;
use crate::game::state::{Formation, UnitStatus, UNIT_WIDTH};

/// Empty cell glyph.
pub const BLANK: u8 = 32;
/// Background colour.
pub const BLACK: u8 = 0;

/// Idle sprites: `[kind][anim_frame][left, right]`.
const UNIT_GLYPHS: [[[u8; 2]; 2]; 3] = [
    [[132, 133], [138, 139]],
    [[130, 131], [136, 137]],
    [[128, 129], [134, 135]],
];

/// Explosion sprites per stage: `[stage][left, right]`.
const EXPLOSION_GLYPHS: [[u8; 2]; 4] = [
    [144, 145],
    [146, 147],
    [148, 149],
    [150, 151],
];

const FIRST_SWARM_GLYPH: u8 = 128;
const LAST_SWARM_GLYPH: u8 = 151;

/// Does this glyph belong to the swarm (idle or exploding)?
#[inline]
pub fn is_swarm_glyph(glyph: u8) -> bool {
    (FIRST_SWARM_GLYPH..=LAST_SWARM_GLYPH).contains(&glyph)
}

/// Idle glyph pair for a kind and animation frame.
#[inline]
pub fn unit_glyphs(kind_index: usize, anim_frame: u8) -> [u8; 2] {
    UNIT_GLYPHS[kind_index.min(UNIT_GLYPHS.len() - 1)][(anim_frame & 1) as usize]
}

/// Explosion glyph pair for a stage.
#[inline]
pub fn explosion_glyphs(stage: u32) -> [u8; 2] {
    EXPLOSION_GLYPHS[(stage as usize).min(EXPLOSION_GLYPHS.len() - 1)]
}

/// Draw pass for one frame.
///
/// Runs after all logic for the frame has settled.
pub fn render_formation<S>(formation: &mut Formation, config: &SwarmConfig, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    let field = CellRect::new(Cell::ZERO, config.playfield_cols, config.playfield_rows);

    if formation.dirty {
        formation.dirty = false;
        redraw_formation(formation, field, surface);
        formation.drawn_origin = Some(formation.origin);
    }

    draw_explosions(formation, config.explosion_stages, field, surface);
}

/// Erase the footprint from the last redraw, then draw every living unit
/// at the new origin.
///
/// Every slot is erased, dead ones included, since a unit may have died
/// without its sprite ever being replaced by an explosion stage.
fn redraw_formation<S>(formation: &Formation, field: CellRect, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    if let Some(drawn) = formation.drawn_origin {
        for unit in formation.units() {
            erase_pair(unit.cell_at(drawn), field, surface);
        }
    }

    let origin = formation.origin;
    for unit in formation.units().iter().filter(|u| u.is_alive()) {
        let glyphs = unit_glyphs(unit.kind.index(), formation.anim_frame);
        draw_pair(unit.cell_at(origin), glyphs, unit.color, field, surface);
    }
}

/// Draw explosion stages and clear units that have finished.
fn draw_explosions<S>(formation: &mut Formation, final_stage: u32, field: CellRect, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    let origin = formation.origin;

    for unit in formation.units_mut() {
        match unit.status {
            UnitStatus::Exploding if unit.anim_stage < final_stage => {
                let cell = unit.cell_at(origin);
                if let Some(old) = unit.drawn_at.filter(|old| *old != cell) {
                    erase_pair(old, field, surface);
                }
                draw_pair(cell, explosion_glyphs(unit.anim_stage), unit.color, field, surface);
                unit.drawn_at = Some(cell);
            }
            UnitStatus::Dead => {
                if let Some(old) = unit.drawn_at.take() {
                    erase_pair(old, field, surface);
                }
            }
            // Revived; the redraw already blanked its last explosion frame
            UnitStatus::Alive => unit.drawn_at = None,
            UnitStatus::Exploding => {}
        }
    }
}

fn draw_pair<S>(cell: Cell, glyphs: [u8; 2], color: u8, field: CellRect, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    for (dc, glyph) in (0..UNIT_WIDTH).zip(glyphs) {
        let target = cell.offset(dc, 0);
        if field.contains(target) {
            surface.put(target, glyph, color);
        }
    }
}

/// Blank a unit's cells, leaving anything that isn't ours alone.
fn erase_pair<S>(cell: Cell, field: CellRect, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    for dc in 0..UNIT_WIDTH {
        let target = cell.offset(dc, 0);
        if field.contains(target) && is_swarm_glyph(surface.glyph_at(target)) {
            surface.put(target, BLANK, BLACK);
        }
    }
}

// =============================================================================
// IN-MEMORY SURFACE
// =============================================================================

/// Glyph and colour planes for a text screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharBuffer {
    cols: i32,
    rows: i32,
    glyphs: Vec<u8>,
    colors: Vec<u8>,
}

impl CharBuffer {
    /// Blank screen of the given size.
    pub fn new(cols: i32, rows: i32) -> Self {
        let len = (cols.max(0) * rows.max(0)) as usize;
        Self {
            cols,
            rows,
            glyphs: vec![BLANK; len],
            colors: vec![BLACK; len],
        }
    }

    /// Blank screen sized to a swarm's playfield.
    pub fn for_config(config: &SwarmConfig) -> Self {
        Self::new(config.playfield_cols, config.playfield_rows)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col < 0 || cell.row < 0 || cell.col >= self.cols || cell.row >= self.rows {
            return None;
        }
        Some((cell.row * self.cols + cell.col) as usize)
    }

    /// Colour at a cell (`BLACK` off-screen).
    pub fn color_at(&self, cell: Cell) -> u8 {
        self.index(cell).map_or(BLACK, |i| self.colors[i])
    }

    /// Number of cells holding a glyph that matches.
    pub fn count_where(&self, pred: impl Fn(u8) -> bool) -> usize {
        self.glyphs.iter().filter(|g| pred(**g)).count()
    }

    /// One row as text; swarm glyphs show as `#` and `*`.
    pub fn row_text(&self, row: i32) -> String {
        (0..self.cols)
            .map(|col| match self.glyph_at(Cell::new(col, row)) {
                g if (FIRST_SWARM_GLYPH..EXPLOSION_GLYPHS[0][0]).contains(&g) => '#',
                g if is_swarm_glyph(g) => '*',
                g if g.is_ascii_graphic() || g == BLANK => g as char,
                _ => '?',
            })
            .collect()
    }
}

impl RenderSurface for CharBuffer {
    fn put(&mut self, cell: Cell, glyph: u8, color: u8) {
        if let Some(i) = self.index(cell) {
            self.glyphs[i] = glyph;
            self.colors[i] = color;
        }
    }

    fn glyph_at(&self, cell: Cell) -> u8 {
        self.index(cell).map_or(BLANK, |i| self.glyphs[i])
    }
}
