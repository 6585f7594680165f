//! Battle screen. The player's creature changes daily, the opponent hourly;
//! HP bars drain over the day and over the hour.

use core::fmt::Write;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Ellipse, Line, PrimitiveStyle, Rectangle, Triangle},
};
use u8g2_fonts::{fonts, types::VerticalPosition, FontRenderer};

use super::{text::draw_text, WatchInputs};
use crate::calendar::CalendarTime;

pub(crate) const SPECIES: usize = 151;
pub(crate) const SPRITE_SIZE: Size = Size::new(80, 68);
pub(crate) const PLAYER_SPRITE: Point = Point::new(10, 60);
pub(crate) const ENEMY_SPRITE: Point = Point::new(120, 10);
pub(crate) const PLAYER_HP_BAR: Point = Point::new(120, 104);
pub(crate) const ENEMY_HP_BAR: Point = Point::new(40, 34);
pub(crate) const HP_BAR_HEIGHT: u32 = 4;
pub(crate) const HP_BAR_MAX: u32 = 60;
pub(crate) const CURSOR_SIZE: Size = Size::new(8, 9);

const NAME_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_courB08_tf>();
const TIME_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_courB14_tf>();

const UNIX_EPOCH_YEAR: u32 = 1970;

/// `frac(v * (sin v + 1))` with `v = seed^(6/7)`.
fn scramble(seed: u32) -> f64 {
    let mut v = libm::pow(f64::from(seed), 6.0 / 7.0);
    v *= libm::sin(v) + 1.0;
    v - libm::floor(v)
}

fn day_seed(time: &CalendarTime) -> u32 {
    let years = u32::from(time.year).saturating_sub(UNIX_EPOCH_YEAR);
    (years * 12 + u32::from(time.month)) * 31 + u32::from(time.day)
}

pub(crate) fn random_day(time: &CalendarTime) -> f64 {
    scramble(day_seed(time))
}

pub(crate) fn random_hour(time: &CalendarTime) -> f64 {
    scramble(day_seed(time) * 24 + u32::from(time.hour))
}

pub(crate) fn random_minute(time: &CalendarTime) -> f64 {
    scramble((day_seed(time) * 24 + u32::from(time.hour)) * 60 + u32::from(time.minute))
}

/// Zero-based index into `NAMES`.
pub(crate) fn species(random: f64) -> usize {
    ((random * SPECIES as f64) as usize).min(SPECIES - 1)
}

pub(crate) fn player_hp(time: &CalendarTime) -> u32 {
    HP_BAR_MAX - u32::from(time.minute_of_day()) / 24
}

pub(crate) fn enemy_hp(time: &CalendarTime) -> u32 {
    HP_BAR_MAX - u32::from(time.minute)
}

/// Menu slot 0..=3, row-major: FIGHT, PkMn, ITEM, RUN.
pub(crate) fn cursor_slot(time: &CalendarTime) -> u8 {
    ((random_minute(time) * 4.0) as u8).min(3)
}

pub(crate) fn cursor_origin(slot: u8) -> Point {
    let col = i32::from(slot % 2);
    let row = i32::from(slot / 2);
    Point::new(90 + col * 61, 148 + row * 20)
}

pub(crate) fn render<T>(inputs: &WatchInputs, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    let time = &inputs.time;
    target.clear(BinaryColor::Off)?;
    draw_frame(target)?;

    let player = species(random_day(time));
    let enemy = species(random_hour(time));
    let mut line = heapless::String::<16>::new();

    draw_creature(target, PLAYER_SPRITE, player, true)?;
    draw_label(target, NAMES[player], Point::new(100, 90))?;
    let _ = write!(line, ":L{}", inputs.battery_percent());
    draw_label(target, &line, Point::new(130, 100))?;
    draw_hp_bar(target, PLAYER_HP_BAR, player_hp(time))?;

    draw_creature(target, ENEMY_SPRITE, enemy, false)?;
    draw_label(target, NAMES[enemy], Point::new(20, 20))?;
    line.clear();
    let _ = write!(line, ":L{}", inputs.steps / 100);
    draw_label(target, &line, Point::new(50, 30))?;
    draw_hp_bar(target, ENEMY_HP_BAR, enemy_hp(time))?;

    line.clear();
    let _ = write!(line, "{:>2}/ {:>2}", time.day, time.month);
    draw_label(target, &line, Point::new(130, 120))?;

    line.clear();
    let _ = write!(line, "{:02}:{:02}", time.hour, time.minute);
    draw_text(
        target,
        &TIME_FONT,
        &line,
        Point::new(14, 165),
        VerticalPosition::Baseline,
        BinaryColor::On,
    )?;

    let cursor = cursor_origin(cursor_slot(time));
    let size = CURSOR_SIZE;
    Triangle::new(
        cursor,
        cursor + Point::new(0, size.height as i32 - 1),
        cursor + Point::new(size.width as i32 - 1, size.height as i32 / 2),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(target)
}

fn draw_label<T>(target: &mut T, text: &str, baseline_left: Point) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    draw_text(
        target,
        &NAME_FONT,
        text,
        baseline_left,
        VerticalPosition::Baseline,
        BinaryColor::On,
    )
}

fn draw_hp_bar<T>(target: &mut T, origin: Point, width: u32) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    if width == 0 {
        return Ok(());
    }
    Rectangle::new(origin, Size::new(width, HP_BAR_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)
}

/// Status boxes, the menu and the time panel.
fn draw_frame<T>(target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let thick = PrimitiveStyle::with_stroke(BinaryColor::On, 2);

    // Opponent status: HP caption and an L-shaped rule under the bar.
    draw_label(target, "HP:", Point::new(16, 38))?;
    Line::new(Point::new(12, 42), Point::new(12, 24))
        .into_styled(stroke)
        .draw(target)?;
    Line::new(Point::new(12, 42), Point::new(104, 42))
        .into_styled(stroke)
        .draw(target)?;

    // Player status, mirrored.
    draw_label(target, "HP:", Point::new(100, 108))?;
    Line::new(Point::new(188, 112), Point::new(188, 94))
        .into_styled(stroke)
        .draw(target)?;
    Line::new(Point::new(96, 112), Point::new(188, 112))
        .into_styled(stroke)
        .draw(target)?;

    Rectangle::new(Point::new(0, 136), Size::new(200, 64))
        .into_styled(thick)
        .draw(target)?;
    Rectangle::new(Point::new(80, 136), Size::new(120, 64))
        .into_styled(thick)
        .draw(target)?;
    for (text, slot) in [("FIGHT", 0u8), ("PkMn", 1), ("ITEM", 2), ("RUN", 3)] {
        let origin = cursor_origin(slot) + Point::new(10, 8);
        draw_label(target, text, origin)?;
    }
    Ok(())
}

/// Stand-in silhouette: body and head sized by species number, with the
/// number written across the body. Back view for the player, front view
/// with eyes for the opponent.
fn draw_creature<T>(
    target: &mut T,
    origin: Point,
    index: usize,
    back: bool,
) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 2);
    let spread = (index % 5) as u32 * 4;
    let body = Size::new(44 + spread, 34 + (index % 3) as u32 * 4);
    let body_top_left = origin
        + Point::new(
            (SPRITE_SIZE.width - body.width) as i32 / 2,
            (SPRITE_SIZE.height - body.height) as i32,
        );
    Ellipse::new(body_top_left, body)
        .into_styled(stroke)
        .draw(target)?;

    let head = 20 + (index % 4) as u32 * 2;
    let head_top_left = Point::new(
        origin.x + (SPRITE_SIZE.width - head) as i32 / 2,
        body_top_left.y - head as i32 + 4,
    );
    Circle::new(head_top_left, head)
        .into_styled(stroke)
        .draw(target)?;

    if !back {
        let eye_y = head_top_left.y + head as i32 / 3;
        let centre_x = head_top_left.x + head as i32 / 2;
        for dx in [-5, 3] {
            Rectangle::new(Point::new(centre_x + dx, eye_y), Size::new(2, 3))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
        }
    }

    let mut number = heapless::String::<4>::new();
    let _ = write!(number, "{:03}", index + 1);
    let text_origin =
        body_top_left + Point::new(body.width as i32 / 2 - 9, body.height as i32 / 2 + 3);
    draw_label(target, &number, text_origin)
}

pub(crate) const NAMES: [&str; SPECIES] = [
    "BULBASAUR", "IVYSAUR", "VENUSAUR", "CHARMANDER", "CHARMELEON", "CHARIZARD", "SQUIRTLE",
    "WARTORTLE", "BLASTOISE", "CATERPIE", "METAPOD", "BUTTERFREE", "WEEDLE", "KAKUNA",
    "BEEDRILL", "PIDGEY", "PIDGEOTTO", "PIDGEOT", "RATTATA", "RATICATE", "SPEAROW", "FEAROW",
    "EKANS", "ARBOK", "PIKACHU", "RAICHU", "SANDSHREW", "SANDSLASH", "NIDORAN", "NIDORINA",
    "NIDOQUEEN", "NIDORAN", "NIDORINO", "NIDOKING", "CLEFAIRY", "CLEFABLE", "VULPIX",
    "NINETALES", "JIGGLYPUFF", "WIGGLYTUFF", "ZUBAT", "GOLBAT", "ODDISH", "GLOOM", "VILEPLUME",
    "PARAS", "PARASECT", "VENONAT", "VENOMOTH", "DIGLETT", "DUGTRIO", "MEOWTH", "PERSIAN",
    "PSYDUCK", "GOLDUCK", "MANKEY", "PRIMEAPE", "GROWLITHE", "ARCANINE", "POLIWAG", "POLIWHIRL",
    "POLIWRATH", "ABRA", "KADABRA", "ALAKAZAM", "MACHOP", "MACHOKE", "MACHAMP", "BELLSPROUT",
    "WEEPINBELL", "VICTREEBEL", "TENTACOOL", "TENTACRUEL", "GEODUDE", "GRAVELER", "GOLEM",
    "PONYTA", "RAPIDASH", "SLOWPOKE", "SLOWBRO", "MAGNEMITE", "MAGNETON", "FARFETCH'D", "DODUO",
    "DODRIO", "SEEL", "DEWGONG", "GRIMER", "MUK", "SHELLDER", "CLOYSTER", "GASTLY", "HAUNTER",
    "GENGAR", "ONIX", "DROWZEE", "HYPNO", "KRABBY", "KINGLER", "VOLTORB", "ELECTRODE",
    "EXEGGCUTE", "EXEGGUTOR", "CUBONE", "MAROWAK", "HITMONLEE", "HITMONCHAN", "LICKITUNG",
    "KOFFING", "WEEZING", "RHYHORN", "RHYDON", "CHANSEY", "TANGELA", "KANGASKHAN", "HORSEA",
    "SEADRA", "GOLDEEN", "SEAKING", "STARYU", "STARMIE", "MR. MIME", "SCYTHER", "JYNX",
    "ELECTABUZZ", "MAGMAR", "PINSIR", "TAUROS", "MAGIKARP", "GYARADOS", "LAPRAS", "DITTO",
    "EEVEE", "VAPOREON", "JOLTEON", "FLAREON", "PORYGON", "OMANYTE", "OMASTAR", "KABUTO",
    "KABUTOPS", "AERODACTYL", "SNORLAX", "ARTICUNO", "ZAPDOS", "MOLTRES", "DRATINI", "DRAGONAIR",
    "DRAGONITE", "MEWTWO", "MEW",
];
