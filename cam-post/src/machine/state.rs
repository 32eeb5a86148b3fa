//! Modal machine state
//!
//! [`Machine`] aggregates one [`Emitter`] per tracked parameter. Each setter
//! returns the rendered word, or an empty string when the machine is already
//! in the requested state.

use super::emitter::{format_number, Emitter};
use crate::types::{Direction, ParametersExt, Parameters, Plane};

/// Motion mode (`G0` / `G1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Rapid,
    Linear,
}

impl Motion {
    pub fn code(self) -> u8 {
        match self {
            Motion::Rapid => 0,
            Motion::Linear => 1,
        }
    }
}

/// Unit mode (`G20` / `G21`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Inches,
    Millimeters,
}

impl Units {
    pub fn code(self) -> u8 {
        match self {
            Units::Inches => 20,
            Units::Millimeters => 21,
        }
    }
}

/// Positioning mode (`G90` / `G91`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    Absolute,
    Incremental,
}

impl Positioning {
    pub fn code(self) -> u8 {
        match self {
            Positioning::Absolute => 90,
            Positioning::Incremental => 91,
        }
    }
}

/// Feed-rate mode (`G94` / `G95`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    PerMinute,
    PerRevolution,
}

impl FeedMode {
    pub fn code(self) -> u8 {
        match self {
            FeedMode::PerMinute => 94,
            FeedMode::PerRevolution => 95,
        }
    }
}

/// Spindle `M` codes
pub const SPINDLE_CW: u8 = 3;
pub const SPINDLE_CCW: u8 = 4;
pub const SPINDLE_STOP: u8 = 5;

/// Map any direction spelling to its spindle code
pub fn spindle_code(direction: Direction) -> u8 {
    if direction.is_clockwise() {
        SPINDLE_CW
    } else {
        SPINDLE_CCW
    }
}

/// Map a plane spelling to its plane selection code
pub fn plane_code(plane: Plane) -> u8 {
    match plane {
        Plane::Xy => 17,
        Plane::Zx => 18,
        Plane::Yz => 19,
    }
}

/// A partial set of axis values; omitted axes are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Self::default()
        }
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }

    /// Pick numeric `x`..`c` values out of event parameters
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            x: params.number("x"),
            y: params.number("y"),
            z: params.number("z"),
            a: params.number("a"),
            b: params.number("b"),
            c: params.number("c"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Join rendered words with single spaces, dropping empty ones
pub fn join_words<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .flat_map(|word| {
            word.as_ref()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The modal state of one machine
#[derive(Debug, Clone)]
pub struct Machine {
    x: Emitter<f64>,
    y: Emitter<f64>,
    z: Emitter<f64>,
    a: Emitter<f64>,
    b: Emitter<f64>,
    c: Emitter<f64>,
    motion: Emitter<u8>,
    units: Emitter<u8>,
    positioning: Emitter<u8>,
    feed_mode: Emitter<u8>,
    plane: Emitter<u8>,
    spindle_speed: Emitter<f64>,
    spindle: Emitter<u8>,
    feed_rate: Emitter<f64>,
    tool: Emitter<u32>,
}

impl Machine {
    /// Create a machine with every parameter unset
    pub fn new() -> Self {
        Self {
            x: Emitter::with_transform("X", format_number),
            y: Emitter::with_transform("Y", format_number),
            z: Emitter::with_transform("Z", format_number),
            a: Emitter::with_transform("A", format_number),
            b: Emitter::with_transform("B", format_number),
            c: Emitter::with_transform("C", format_number),
            motion: Emitter::new("G"),
            units: Emitter::new("G"),
            positioning: Emitter::new("G"),
            feed_mode: Emitter::new("G"),
            plane: Emitter::new("G"),
            spindle_speed: Emitter::with_transform("S", format_number),
            spindle: Emitter::new("M"),
            feed_rate: Emitter::with_transform("F", format_number),
            tool: Emitter::new("T"),
        }
    }

    /// Forget all modal state; the next value of every parameter is written
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Render every provided axis, joined into one space-separated string
    pub fn set_position(&mut self, position: Position, force: bool) -> String {
        join_words([
            self.x.render(position.x, force),
            self.y.render(position.y, force),
            self.z.render(position.z, force),
            self.a.render(position.a, force),
            self.b.render(position.b, force),
            self.c.render(position.c, force),
        ])
    }

    pub fn set_motion(&mut self, motion: Motion, force: bool) -> String {
        self.motion.render(Some(motion.code()), force)
    }

    pub fn set_units(&mut self, units: Units, force: bool) -> String {
        self.units.render(Some(units.code()), force)
    }

    pub fn set_positioning(&mut self, positioning: Positioning, force: bool) -> String {
        self.positioning.render(Some(positioning.code()), force)
    }

    pub fn set_feed_mode(&mut self, mode: FeedMode, force: bool) -> String {
        self.feed_mode.render(Some(mode.code()), force)
    }

    pub fn set_plane(&mut self, plane: Plane, force: bool) -> String {
        self.plane.render(Some(plane_code(plane)), force)
    }

    pub fn set_spindle_speed(&mut self, speed: f64, force: bool) -> String {
        self.spindle_speed.render(Some(speed), force)
    }

    pub fn set_spindle_direction(&mut self, direction: Direction, force: bool) -> String {
        self.spindle.render(Some(spindle_code(direction)), force)
    }

    /// Shares the direction emitter so a later start is always written
    pub fn stop_spindle(&mut self, force: bool) -> String {
        self.spindle.render(Some(SPINDLE_STOP), force)
    }

    pub fn set_feed_rate(&mut self, feed: f64, force: bool) -> String {
        self.feed_rate.render(Some(feed), force)
    }

    pub fn set_tool(&mut self, tool: u32, force: bool) -> String {
        self.tool.render(Some(tool), force)
    }

    /// Currently selected tool, if any
    pub fn tool(&self) -> Option<u32> {
        self.tool.value().copied()
    }

    /// Current spindle `M` code, if any
    pub fn spindle(&self) -> Option<u8> {
        self.spindle.value().copied()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamValue;

    #[test]
    fn test_position_suppresses_repeats() {
        let mut machine = Machine::new();
        let target = Position::xyz(10.0, 20.0, 30.0);

        assert_eq!(machine.set_position(target, false), "X10 Y20 Z30");
        assert_eq!(machine.set_position(target, false), "");
        assert_eq!(machine.set_position(target, true), "X10 Y20 Z30");
    }

    #[test]
    fn test_partial_position() {
        let mut machine = Machine::new();
        machine.set_position(Position::xyz(1.0, 2.0, 3.0), false);

        assert_eq!(machine.set_position(Position::new().with_y(5.0), false), "Y5");
        assert_eq!(
            machine.set_position(Position::xyz(1.0, 5.0, 4.0), false),
            "Z4"
        );
        assert_eq!(machine.set_position(Position::new(), true), "");
    }

    #[test]
    fn test_rotary_axes() {
        let mut machine = Machine::new();
        let pos = Position::new().with_x(0.0).with_a(90.0).with_c(-45.0);
        assert_eq!(machine.set_position(pos, false), "X0 A90 C-45");
    }

    #[test]
    fn test_spindle_direction_normalization() {
        let mut machine = Machine::new();

        assert_eq!(machine.set_spindle_direction(Direction::Clw, false), "M3");
        // Different spelling, same code
        assert_eq!(machine.set_spindle_direction(Direction::Cw, false), "");
        assert_eq!(machine.set_spindle_direction(Direction::Cclw, false), "M4");
        assert_eq!(machine.set_spindle_direction(Direction::Ccw, false), "");
    }

    #[test]
    fn test_spindle_stop_rearms_direction() {
        let mut machine = Machine::new();

        assert_eq!(machine.set_spindle_direction(Direction::Cw, false), "M3");
        assert_eq!(machine.stop_spindle(false), "M5");
        assert_eq!(machine.stop_spindle(false), "");
        assert_eq!(machine.set_spindle_direction(Direction::Cw, false), "M3");
        assert_eq!(machine.spindle(), Some(SPINDLE_CW));
    }

    #[test]
    fn test_plane_codes() {
        let mut machine = Machine::new();

        assert_eq!(machine.set_plane(Plane::Xy, false), "G17");
        assert_eq!(machine.set_plane(Plane::Zx, false), "G18");
        assert_eq!(machine.set_plane(Plane::Yz, false), "G19");
        assert_eq!(machine.set_plane(Plane::Yz, false), "");
    }

    #[test]
    fn test_modal_groups_are_independent() {
        let mut machine = Machine::new();

        assert_eq!(machine.set_motion(Motion::Rapid, false), "G0");
        assert_eq!(machine.set_units(Units::Millimeters, false), "G21");
        assert_eq!(machine.set_positioning(Positioning::Absolute, false), "G90");
        assert_eq!(machine.set_feed_mode(FeedMode::PerMinute, false), "G94");
        assert_eq!(machine.set_motion(Motion::Rapid, false), "");
        assert_eq!(machine.set_motion(Motion::Linear, false), "G1");
        assert_eq!(machine.set_units(Units::Inches, false), "G20");
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut machine = Machine::new();
        machine.set_tool(4, false);
        machine.set_feed_rate(500.0, false);

        machine.reset();

        assert_eq!(machine.tool(), None);
        assert_eq!(machine.set_tool(4, false), "T4");
        assert_eq!(machine.set_feed_rate(500.0, false), "F500");
    }

    #[test]
    fn test_position_from_parameters() {
        let mut params = Parameters::new();
        params.insert("x".to_string(), ParamValue::Number(1.5));
        params.insert("z".to_string(), ParamValue::Number(-3.0));
        params.insert("y".to_string(), ParamValue::Text("n/a".to_string()));

        let pos = Position::from_parameters(&params);
        assert_eq!(pos, Position::new().with_x(1.5).with_z(-3.0));
        assert!(Position::new().is_empty());
    }

    #[test]
    fn test_join_words() {
        assert_eq!(join_words(["G0", "", "X1  ", " Y2"]), "G0 X1 Y2");
        assert_eq!(join_words(["", ""]), "");
        assert_eq!(join_words(["A  B"]), "A B");
    }
}
