// End-to-end: trace text in, numbered program text out
use cam_post::{
    BuilderConfig, Direction, Emit, ParamValue, ParametersExt, Plane, Position, PostError,
    Program, Symbol, TraceParser,
};

const TRACE: &str = "\
(0)@start_of_file program_number: '1234'
(1)@work_plane plane: XYPLANE
(2)@tool_change tool_number: 3 comment: 'D10 FLAT'
(3)@spindle_on speed: 12000rpm direction: CLW
(4)@rapid_move x: 0mm y: 0mm z: 100mm
(5)@rapid_move x: 0mm y: 0mm z: 100mm
(6)@linear_move
  x: 50mm y: 0mm z: 100mm
  feed: 800mm/min
(7)@spindle_off
(8)@end_of_file
";

fn standard_program(config: BuilderConfig) -> Program {
    let mut program = Program::new(config);

    program.on("StartOfFile", |ctx, params, _| {
        if let Some(number) = params.text("program_number") {
            ctx.comment(&format!("PROGRAM {}", number));
        }
        Ok(())
    });
    program.on("WorkPlane", |ctx, params, _| {
        if let Some(Symbol::Plane(plane)) = params.symbol("plane") {
            ctx.set_plane(plane, Emit::new());
        }
        Ok(())
    });
    program.on("ToolChange", |ctx, params, _| {
        let tool = params.require_number("tool_number")?;
        ctx.change_tool(tool as u32, Emit::new());
        Ok(())
    });
    program.on("SpindleOn", |ctx, params, _| {
        let speed = params.require_number("speed")?;
        let direction = match params.symbol("direction") {
            Some(Symbol::Direction(direction)) => direction,
            _ => Direction::Cw,
        };
        ctx.start_spindle(speed, direction, Emit::new());
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
    program.on("SpindleOff", |ctx, _, _| {
        ctx.stop_spindle(Emit::new());
        Ok(())
    });
    program.on("EndOfFile", |ctx, _, _| {
        ctx.end_program(Emit::new());
        Ok(())
    });

    program
}

#[test]
fn parses_start_and_end_of_file() {
    let events = TraceParser::parse("(0)@start_of_file\nprogram_number: '1234'\n(1)@end_of_file");

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "StartOfFile");
    assert_eq!(
        events[0].parameters.get("program_number"),
        Some(&ParamValue::Text("1234".to_string()))
    );
    assert_eq!(events[1].name, "EndOfFile");
}

#[test]
fn marker_count_matches_record_count() {
    let events = TraceParser::parse(TRACE);

    assert_eq!(events.len(), 9);
    for (expected, event) in events.iter().enumerate() {
        assert_eq!(event.index, expected);
    }
    assert_eq!(
        events[1].parameters.get("plane"),
        Some(&ParamValue::Symbol(Symbol::Plane(Plane::Xy)))
    );
}

#[test]
fn exponent_coordinates_are_posted() {
    let mut program = Program::default();
    program.load_trace("(0)@rapid_move x: 10 y: 0 z: 2.5e1mm\n(1)@rapid_move x: 1e-5 y: 0 z: 25\n");
    program.on("RapidMove", |ctx, params, _| {
        ctx.rapid(Position::from_parameters(params), Emit::new());
        Ok(())
    });

    program.process().unwrap();
    let files = program.generate();

    assert_eq!(files[0].text, "N10 G0 X10 Y0 Z25\nN20 X0");
}

#[test]
fn rapid_move_listener_writes_g0() {
    let mut program = Program::default();
    program.load_trace("(0)@rapid_move x: 0 y: 0 z: 100\n(1)@rapid_move x: 0 y: 0 z: 100\n");
    program.on("RapidMove", |ctx, params, _| {
        ctx.rapid(Position::from_parameters(params), Emit::new());
        Ok(())
    });

    program.process().unwrap();
    let files = program.generate();

    assert_eq!(files[0].text, "N10 G0 X0 Y0 Z100");
}

#[test]
fn full_trace_generates_program() {
    let mut program = standard_program(BuilderConfig::new());
    program.load_trace(TRACE);
    program.process().unwrap();

    let files = program.generate();
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].text,
        "\
N10 (PROGRAM 1234)
N20 G17
N30 T3 M6
N40 S12000 M3
N50 G0 X0 Y0 Z100
N60 G1 X50 F800
N70 M5
N80 M30"
    );
}

#[test]
fn numbering_follows_config() {
    let config = BuilderConfig::new()
        .with_numbering_start(1)
        .with_numbering_increment(2)
        .with_main_file_name("O1234");
    let mut program = standard_program(config);
    program.load_trace("(0)@rapid_move z: 5\n(1)@end_of_file\n");
    program.process().unwrap();

    let files = program.generate();
    assert_eq!(files[0].name, "O1234");
    assert_eq!(files[0].text, "N1 G0 Z5\nN3 M30");

    let mut unnumbered = standard_program(BuilderConfig::new().with_numbering(false));
    unnumbered.load_trace("(0)@rapid_move z: 5\n");
    unnumbered.process().unwrap();
    assert_eq!(unnumbered.generate()[0].text, "G0 Z5");
}

#[test]
fn subprograms_are_separate_files() {
    let mut program = Program::default();
    program.load_trace(
        "\
(0)@subprogram_call name: '100'
(1)@subprogram_start name: '100'
(2)@linear_move x: 10
(3)@subprogram_end
(4)@end_of_file
",
    );

    program.on("SubprogramCall", |ctx, params, _| {
        let name = params.text("name").unwrap_or("1");
        ctx.call_subprogram(name, Emit::new());
        Ok(())
    });
    program.on("SubprogramStart", |ctx, params, _| {
        ctx.new_subprogram(params.text("name").unwrap_or("1"))?;
        Ok(())
    });
    program.on("LinearMove", |ctx, params, _| {
        ctx.line(Position::from_parameters(params), Emit::new());
        Ok(())
    });
    program.on("SubprogramEnd", |ctx, _, _| {
        ctx.end_subprogram()?;
        Ok(())
    });
    program.on("EndOfFile", |ctx, _, _| {
        ctx.end_program(Emit::new());
        Ok(())
    });

    program.process().unwrap();
    let files = program.generate();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].text, "N10 M98 P100\nN20 M30");
    assert_eq!(files[1].name, "100");
    assert_eq!(files[1].text, "N10 G1 X10\nN20 M99");
}

#[test]
fn listener_errors_reach_the_caller() {
    let mut program = standard_program(BuilderConfig::new());
    program.load_trace("(0)@rapid_move z: 50\n(1)@tool_change tool_number: 'T1'\n(2)@end_of_file\n");

    let err = program.process().unwrap_err();
    match err.downcast_ref::<PostError>() {
        Some(PostError::InvalidParameter { key, .. }) => assert_eq!(key, "tool_number"),
        other => panic!("unexpected error: {:?}", other),
    }

    // The rapid move was written before the failure, the program end was not
    let files = program.generate();
    assert_eq!(files[0].text, "N10 G0 Z50");
}

#[test]
fn lookahead_from_listener() {
    let mut program = Program::default();
    program.load_trace(
        "\
(0)@tool_change tool_number: 1
(1)@linear_move x: 1
(2)@tool_change tool_number: 2
(3)@linear_move x: 2
",
    );

    // Preselect the next tool right after each change
    program.on("ToolChange", |ctx, params, meta| {
        ctx.change_tool(params.require_number("tool_number")? as u32, Emit::new());
        if let Some(next) = meta.find_nearest_event("ToolChange") {
            let tool = next.parameters.require_number("tool_number")?;
            ctx.put_line(&format!("T{}", tool));
        }
        Ok(())
    });

    program.process().unwrap();
    let files = program.generate();
    assert_eq!(files[0].text, "N10 T1 M6\nN20 T2\nN30 T2 M6");
}
