//! Standard post wiring
//!
//! Registers listeners for the trace events a typical milling job produces
//! and maps them onto builder verbs.

use crate::config::PostConfig;
use anyhow::{anyhow, Context};
use cam_post::machine::format_number;
use cam_post::{
    Direction, Emit, FeedMode, ParamValue, Parameters, ParametersExt, Plane, Position,
    Positioning, Program, Symbol, Units,
};

/// Events the standard wiring listens to
pub const STANDARD_EVENTS: &[&str] = &[
    "StartOfFile",
    "EndOfFile",
    "RapidMove",
    "LinearMove",
    "SpindleOn",
    "SpindleOff",
    "FeedRate",
    "ToolChange",
    "WorkPlane",
    "Units",
    "Comment",
    "SubprogramStart",
    "SubprogramEnd",
    "SubprogramCall",
];

/// Register the standard listeners on `program`
pub fn register_standard_listeners(program: &mut Program, settings: &PostConfig) {
    let program_number_comment = settings.program_number_comment;
    program.on("StartOfFile", move |ctx, params, _| {
        if program_number_comment {
            if let Some(number) = name_param(params, "program_number") {
                ctx.comment(&format!("PROGRAM {}", number));
            }
        }
        let units = units_param(params)?.unwrap_or(Units::Millimeters);
        ctx.set_units(units, Emit::deferred());
        ctx.set_positioning(Positioning::Absolute, Emit::deferred());
        ctx.set_feed_mode(FeedMode::PerMinute, Emit::deferred());
        ctx.set_plane(Plane::Xy, Emit::new());
        Ok(())
    });

    program.on("EndOfFile", |ctx, _, _| {
        ctx.stop_spindle(Emit::new());
        ctx.end_program(Emit::new());
        Ok(())
    });

    program.on("RapidMove", |ctx, params, _| {
        ctx.rapid(Position::from_parameters(params), Emit::new());
        Ok(())
    });

    program.on("LinearMove", |ctx, params, _| {
        let position = Position::from_parameters(params);
        match params.number("feed") {
            Some(feed) => ctx.line_with_feed(position, feed, Emit::new()),
            None => ctx.line(position, Emit::new()),
        }
        Ok(())
    });

    program.on("SpindleOn", |ctx, params, _| {
        let speed = params.require_number("speed")?;
        let direction = match params.get("direction") {
            None => Direction::Cw,
            Some(ParamValue::Symbol(Symbol::Direction(direction))) => *direction,
            Some(other) => return Err(anyhow!("SpindleOn: unknown direction '{}'", other)),
        };
        ctx.start_spindle(speed, direction, Emit::new());
        Ok(())
    });

    program.on("SpindleOff", |ctx, _, _| {
        ctx.stop_spindle(Emit::new());
        Ok(())
    });

    program.on("FeedRate", |ctx, params, _| {
        ctx.set_feed_rate(params.require_number("feed")?, Emit::new());
        Ok(())
    });

    let safe_z = settings.safe_z;
    let tool_comments = settings.tool_comments;
    program.on("ToolChange", move |ctx, params, meta| {
        let tool = params
            .require_number("tool_number")
            .with_context(|| format!("ToolChange at event #{}", meta.index()))?;
        if tool < 0.0 || tool.fract() != 0.0 || tool > f64::from(u32::MAX) {
            return Err(anyhow!("ToolChange: invalid tool number {}", tool));
        }
        let tool = tool as u32;

        if let Some(z) = safe_z {
            ctx.rapid(Position::new().with_z(z), Emit::new());
        }
        ctx.change_tool(tool, Emit::new());

        if tool_comments {
            if let Some(comment) = params.text("comment") {
                ctx.comment(comment);
            }
        }
        Ok(())
    });

    program.on("WorkPlane", |ctx, params, _| {
        match params.get("plane") {
            Some(ParamValue::Symbol(Symbol::Plane(plane))) => {
                ctx.set_plane(*plane, Emit::new());
                Ok(())
            }
            other => Err(anyhow!("WorkPlane: expected a plane, found {:?}", other)),
        }
    });

    program.on("Units", |ctx, params, _| {
        if let Some(units) = units_param(params)? {
            ctx.set_units(units, Emit::new());
        }
        Ok(())
    });

    program.on("Comment", |ctx, params, _| {
        if let Some(text) = params.text("text") {
            ctx.comment(text);
        }
        Ok(())
    });

    program.on("SubprogramStart", |ctx, params, _| {
        let name = name_param(params, "name").ok_or_else(|| anyhow!("SubprogramStart: missing name"))?;
        ctx.new_subprogram(&name)?;
        Ok(())
    });

    program.on("SubprogramEnd", |ctx, _, _| {
        ctx.end_subprogram()?;
        Ok(())
    });

    program.on("SubprogramCall", |ctx, params, _| {
        let name = name_param(params, "name").ok_or_else(|| anyhow!("SubprogramCall: missing name"))?;
        ctx.call_subprogram(&name, Emit::new());
        Ok(())
    });

    log::debug!("Registered {} standard listeners", STANDARD_EVENTS.len());
}

/// A name-like parameter: quoted text, or a number such as `1001`
fn name_param(params: &Parameters, key: &str) -> Option<String> {
    match params.get(key)? {
        ParamValue::Number(number) => Some(format_number(number)),
        ParamValue::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

/// `units: 'mm'` / `units: 'inch'`
fn units_param(params: &Parameters) -> anyhow::Result<Option<Units>> {
    let Some(units) = params.text("units") else {
        return Ok(None);
    };
    match units.to_ascii_lowercase().as_str() {
        "mm" | "metric" | "millimeters" => Ok(Some(Units::Millimeters)),
        "in" | "inch" | "inches" => Ok(Some(Units::Inches)),
        other => Err(anyhow!("unknown units '{}'", other)),
    }
}
