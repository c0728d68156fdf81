use lbar_core::{
    CapacityError, ColorRole, Directive, DrawCommand, Frame, InputEvent, Lane, LayoutEngine,
    LineAccumulator, ParsedStatus, Renderer, StatusBar, StatusParser, UnderlineGeometry, paint,
};
use proptest::prelude::*;

fn engine() -> LayoutEngine {
    LayoutEngine::new(15.0, UnderlineGeometry { y: 18.0, height: 2.0 })
}

fn ten_per_byte(text: &[u8]) -> f32 {
    text.len() as f32 * 10.0
}

fn lane_texts<'a>(status: &ParsedStatus<'a>, lane: Lane) -> Vec<&'a [u8]> {
    status.lane(lane).iter().map(|b| status.text(b)).collect()
}

fn text_xs(frame: &Frame, lane: Lane) -> Vec<f32> {
    frame
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { x, lane: l, .. } if *l == lane => Some(*x),
            _ => None,
        })
        .collect()
}

// ============================================================================
// StatusParser
// ============================================================================

#[test]
fn test_plain_text_is_one_left_block() {
    let parser = StatusParser::default();
    let status = parser.parse(b"hello world").unwrap();

    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"hello world"[..]]);
    assert!(status.lane(Lane::Center).is_empty());
    assert!(status.lane(Lane::Right).is_empty());
    assert!(!status.lane(Lane::Left)[0].underline);
}

#[test]
fn test_empty_input_has_no_blocks() {
    let status = StatusParser::default().parse(b"").unwrap();
    assert!(status.is_empty());
    assert_eq!(status.block_count(), 0);
}

#[test]
fn test_lane_switches() {
    let status = StatusParser::default().parse(b"a&Rb&Lc&Cd").unwrap();

    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"a"[..], &b"c"[..]]);
    assert_eq!(lane_texts(&status, Lane::Right), vec![&b"b"[..]]);
    assert_eq!(lane_texts(&status, Lane::Center), vec![&b"d"[..]]);
}

#[test]
fn test_underline_toggles() {
    let status = StatusParser::default().parse(b"&Ux&Uy").unwrap();
    let left = status.lane(Lane::Left);

    assert_eq!(left.len(), 2);
    assert_eq!(status.text(&left[0]), b"x");
    assert!(left[0].underline);
    assert_eq!(status.text(&left[1]), b"y");
    assert!(!left[1].underline);
}

#[test]
fn test_underline_survives_lane_switch() {
    let status = StatusParser::default().parse(b"&Ua&Rb&Uc").unwrap();

    assert!(status.lane(Lane::Left)[0].underline);
    let right = status.lane(Lane::Right);
    assert!(right[0].underline);
    assert!(!right[1].underline);
}

#[test]
fn test_unknown_code_splits_block() {
    let status = StatusParser::default().parse(b"a&Zb").unwrap();
    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"a"[..], &b"b"[..]]);
}

#[test]
fn test_trailing_sentinel_is_literal() {
    let status = StatusParser::default().parse(b"load 50&").unwrap();
    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"load 50&"[..]]);
}

#[test]
fn test_lone_sentinel_is_literal() {
    let status = StatusParser::default().parse(b"&").unwrap();
    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"&"[..]]);
}

#[test]
fn test_escaped_sentinel_pair_consumes_both() {
    // "&&" is a sentinel with code '&': unknown, so both bytes vanish.
    let status = StatusParser::default().parse(b"a&&b").unwrap();
    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"a"[..], &b"b"[..]]);
}

#[test]
fn test_adjacent_directives_emit_no_empty_blocks() {
    let status = StatusParser::default().parse(b"&R&U&Lx&C").unwrap();

    assert_eq!(status.block_count(), 1);
    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"x"[..]]);
    assert!(status.lane(Lane::Left)[0].underline);
}

#[test]
fn test_directives_only_input_is_empty() {
    let status = StatusParser::default().parse(b"&L&C&R&U&U").unwrap();
    assert!(status.is_empty());
}

#[test]
fn test_custom_sentinel() {
    let parser = StatusParser::new(b'%', 8);
    let status = parser.parse(b"a&Rb%Rc").unwrap();

    assert_eq!(lane_texts(&status, Lane::Left), vec![&b"a&Rb"[..]]);
    assert_eq!(lane_texts(&status, Lane::Right), vec![&b"c"[..]]);
}

#[test]
fn test_lane_overflow() {
    let parser = StatusParser::new(b'&', 2);
    let err = parser.parse(b"a&Ub&Uc").unwrap_err();

    assert_eq!(
        err,
        CapacityError::LaneOverflow {
            lane: Lane::Left,
            capacity: 2
        }
    );
}

#[test]
fn test_lane_capacity_is_per_lane() {
    let parser = StatusParser::new(b'&', 2);
    let status = parser.parse(b"a&Ub&Rc&Ud&Ce&Uf").unwrap();
    assert_eq!(status.block_count(), 6);
}

#[test]
fn test_directive_codes() {
    for (code, directive) in [
        (b'L', Directive::SwitchLeft),
        (b'C', Directive::SwitchCenter),
        (b'R', Directive::SwitchRight),
        (b'U', Directive::ToggleUnderline),
    ] {
        assert_eq!(Directive::from_code(code), Some(directive));
        assert_eq!(directive.code(), code);
    }
    assert_eq!(Directive::from_code(b'l'), None);
    assert_eq!(Directive::from_code(b'&'), None);
}

#[test]
fn test_parsed_status_keeps_source() {
    let line = b"x&Ry";
    let status = StatusParser::default().parse(line).unwrap();
    assert_eq!(status.source(), line);
    assert_eq!(status.block_count(), 2);
}

#[test]
fn test_block_ranges_point_into_source() {
    let line = b"cpu &R12%";
    let status = StatusParser::default().parse(line).unwrap();
    let right = status.lane(Lane::Right)[0];

    assert_eq!(right.start, 6);
    assert_eq!(right.len, 3);
    assert_eq!(&line[right.range()], b"12%");
}

// ============================================================================
// LayoutEngine
// ============================================================================

#[test]
fn test_left_lane_accumulates_from_zero() {
    let status = StatusParser::default().parse(b"ab&Ucde").unwrap();
    let frame = engine().layout(&status, ten_per_byte, 200.0);

    assert_eq!(text_xs(&frame, Lane::Left), vec![0.0, 20.0]);
}

#[test]
fn test_center_blocks_sit_side_by_side() {
    let status = StatusParser::default().parse(b"&CX&UY").unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    assert_eq!(text_xs(&frame, Lane::Center), vec![45.0, 55.0]);
}

#[test]
fn test_right_lane_stacks_in_reverse() {
    // margin = measure(" ") = 10; "cc" is rightmost.
    let status = StatusParser::default().parse(b"&Ra&Ubbb&Ucc").unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    let placed: Vec<(Vec<u8>, f32)> = frame
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { span, x, .. } => Some((status.text(span).to_vec(), *x)),
            _ => None,
        })
        .collect();

    assert_eq!(
        placed,
        vec![
            (b"cc".to_vec(), 70.0),
            (b"bbb".to_vec(), 40.0),
            (b"a".to_vec(), 30.0),
        ]
    );
}

#[test]
fn test_lanes_emitted_left_center_right() {
    let status = StatusParser::default().parse(b"&Rr&Cc&Ll").unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    let lanes: Vec<Lane> = frame
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { lane, .. } => Some(*lane),
            _ => None,
        })
        .collect();
    assert_eq!(lanes, vec![Lane::Left, Lane::Center, Lane::Right]);
}

#[test]
fn test_underline_rect_precedes_text() {
    let status = StatusParser::default().parse(b"a&Ubb").unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    assert_eq!(frame.len(), 3);
    assert!(frame[0].is_text());
    assert_eq!(
        frame[1],
        DrawCommand::Rect {
            x: 10.0,
            y: 18.0,
            w: 20.0,
            h: 2.0,
            color: ColorRole::Underline,
        }
    );
    match &frame[2] {
        DrawCommand::Text {
            x,
            y,
            underline,
            color,
            ..
        } => {
            assert_eq!(*x, 10.0);
            assert_eq!(*y, 15.0);
            assert!(*underline);
            assert_eq!(*color, ColorRole::Foreground);
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_empty_status_lays_out_nothing() {
    let status = StatusParser::default().parse(b"").unwrap();
    let mut calls = 0;
    let frame = engine().layout(
        &status,
        |t| {
            calls += 1;
            ten_per_byte(t)
        },
        100.0,
    );

    assert!(frame.is_empty());
    assert_eq!(calls, 0);
}

#[test]
fn test_zero_width_measure_is_tolerated() {
    let status = StatusParser::default().parse(b"&Rx&Cy").unwrap();
    let frame = engine().layout(&status, |_| 0.0, 100.0);

    assert_eq!(text_xs(&frame, Lane::Right), vec![100.0]);
    assert_eq!(text_xs(&frame, Lane::Center), vec![50.0]);
}

// ============================================================================
// Frame replay
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Text(Vec<u8>, f32, f32, ColorRole, Lane),
    Rect(f32, f32, f32, f32, ColorRole),
    Present,
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

impl Renderer for RecordingRenderer {
    fn measure_width(&mut self, text: &[u8]) -> f32 {
        ten_per_byte(text)
    }

    fn draw_text(&mut self, text: &[u8], x: f32, y: f32, color: ColorRole, lane: Lane) {
        self.calls.push(Call::Text(text.to_vec(), x, y, color, lane));
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: ColorRole) {
        self.calls.push(Call::Rect(x, y, w, h, color));
    }

    fn present_frame(&mut self) -> anyhow::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

#[test]
fn test_paint_replays_in_order_then_presents() {
    let line = b"&Uup&U&Rdown";
    let status = StatusParser::default().parse(line).unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    let mut r = RecordingRenderer::default();
    paint(line, &frame, &mut r).unwrap();

    assert_eq!(
        r.calls,
        vec![
            Call::Rect(0.0, 18.0, 20.0, 2.0, ColorRole::Underline),
            Call::Text(b"up".to_vec(), 0.0, 15.0, ColorRole::Foreground, Lane::Left),
            Call::Text(b"down".to_vec(), 50.0, 15.0, ColorRole::Foreground, Lane::Right),
            Call::Present,
        ]
    );
}

#[test]
fn test_paint_skips_spans_past_the_status_line() {
    let line = b"&Uup&U&Rdown";
    let status = StatusParser::default().parse(line).unwrap();
    let frame = engine().layout(&status, ten_per_byte, 100.0);

    // "down" lies beyond the end of this shorter line.
    let mut r = RecordingRenderer::default();
    paint(b"&Uup", &frame, &mut r).unwrap();

    assert_eq!(
        r.calls,
        vec![
            Call::Rect(0.0, 18.0, 20.0, 2.0, ColorRole::Underline),
            Call::Text(b"up".to_vec(), 0.0, 15.0, ColorRole::Foreground, Lane::Left),
            Call::Present,
        ]
    );
}

#[test]
fn test_paint_empty_frame_still_presents() {
    let mut r = RecordingRenderer::default();
    paint(b"", &Frame::new(), &mut r).unwrap();
    assert_eq!(r.calls, vec![Call::Present]);
}

// ============================================================================
// LineAccumulator
// ============================================================================

#[test]
fn test_default_line_capacity() {
    assert_eq!(LineAccumulator::default().capacity(), 2048);
}

#[test]
fn test_lines_split_on_newline_and_nul() {
    let mut acc = LineAccumulator::default();
    let mut out = Vec::new();
    acc.feed(b"one\ntwo\0three", &mut out);

    assert_eq!(
        out,
        vec![
            InputEvent::Line(b"one".to_vec()),
            InputEvent::Line(b"two".to_vec()),
        ]
    );
    assert_eq!(acc.pending(), b"three");
}

#[test]
fn test_lines_survive_chunk_boundaries() {
    let mut acc = LineAccumulator::default();
    let mut out = Vec::new();
    acc.feed(b"&Rba", &mut out);
    acc.feed(b"t 9", &mut out);
    assert!(out.is_empty());
    acc.feed(b"0%\n", &mut out);

    assert_eq!(out, vec![InputEvent::Line(b"&Rbat 90%".to_vec())]);
}

#[test]
fn test_empty_lines_are_delivered() {
    let mut acc = LineAccumulator::default();
    let mut out = Vec::new();
    acc.feed(b"\n\n", &mut out);

    assert_eq!(
        out,
        vec![InputEvent::Line(Vec::new()), InputEvent::Line(Vec::new())]
    );
}

#[test]
fn test_carriage_return_is_kept() {
    let mut acc = LineAccumulator::default();
    let mut out = Vec::new();
    acc.feed(b"x\r\n", &mut out);
    assert_eq!(out, vec![InputEvent::Line(b"x\r".to_vec())]);
}

#[test]
fn test_overflow_truncates_and_reports_once() {
    let mut acc = LineAccumulator::new(4);
    let mut out = Vec::new();
    acc.feed(b"abcdefgh", &mut out);
    acc.feed(b"ijk\nok\n", &mut out);

    assert_eq!(
        out,
        vec![
            InputEvent::Overflow(CapacityError::InputOverflow { capacity: 4 }),
            InputEvent::Line(b"abcd".to_vec()),
            InputEvent::Line(b"ok".to_vec()),
        ]
    );
}

#[test]
fn test_overflow_resets_per_line() {
    let mut acc = LineAccumulator::new(2);
    let mut out = Vec::new();
    acc.feed(b"abc\ndef\n", &mut out);

    let overflows = out
        .iter()
        .filter(|e| matches!(e, InputEvent::Overflow(_)))
        .count();
    assert_eq!(overflows, 2);
}

// ============================================================================
// StatusBar
// ============================================================================

#[test]
fn test_update_replaces_status_and_frame() {
    let mut bar = StatusBar::new(StatusParser::default(), engine());

    let frame = bar.update(b"a&Rb", ten_per_byte, 100.0).unwrap();
    assert_eq!(frame.len(), 2);
    assert_eq!(bar.status(), b"a&Rb");

    bar.update(b"", ten_per_byte, 100.0).unwrap();
    assert!(bar.frame().is_empty());
    assert!(bar.status().is_empty());
}

#[test]
fn test_overflowing_update_keeps_previous_frame() {
    let mut bar = StatusBar::new(StatusParser::new(b'&', 1), engine());
    bar.update(b"kept", ten_per_byte, 100.0).unwrap();
    let before = bar.frame().clone();

    let err = bar.update(b"x&Uy", ten_per_byte, 100.0).unwrap_err();

    assert!(matches!(err, CapacityError::LaneOverflow { lane: Lane::Left, .. }));
    assert_eq!(bar.status(), b"kept");
    assert_eq!(bar.frame(), &before);
}

#[test]
fn test_status_bar_exposes_its_parts() {
    let mut bar = StatusBar::new(StatusParser::new(b'%', 3), engine());
    assert_eq!(bar.parser().lane_capacity(), 3);
    assert_eq!(bar.layout_engine().baseline(), 15.0);

    bar.update(b"a%Rb", ten_per_byte, 100.0).unwrap();
    let parsed = bar.parsed().unwrap();
    assert_eq!(lane_texts(&parsed, Lane::Right), vec![&b"b"[..]]);
}

#[test]
fn test_new_bar_is_blank() {
    let bar = StatusBar::new(StatusParser::default(), engine());
    assert!(bar.status().is_empty());
    assert!(bar.frame().is_empty());
}

#[test]
fn test_relayout_uses_new_width() {
    let mut bar = StatusBar::new(StatusParser::default(), engine());
    bar.update(b"&Rab", ten_per_byte, 100.0).unwrap();
    assert_eq!(text_xs(bar.frame(), Lane::Right), vec![70.0]);

    bar.relayout(ten_per_byte, 200.0);
    assert_eq!(text_xs(bar.frame(), Lane::Right), vec![170.0]);
}

#[test]
fn test_relayout_picks_up_new_geometry() {
    let mut bar = StatusBar::new(StatusParser::default(), engine());
    bar.update(b"x", ten_per_byte, 100.0).unwrap();

    bar.set_layout_engine(LayoutEngine::new(30.0, UnderlineGeometry { y: 38.0, height: 2.0 }));
    bar.relayout(ten_per_byte, 100.0);

    match &bar.frame()[0] {
        DrawCommand::Text { y, .. } => assert_eq!(*y, 30.0),
        other => panic!("expected text, got {other:?}"),
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Strip every sentinel+code pair the way the parser does.
fn strip_directives(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < buf.len() {
        if buf[i] == b'&' && i + 1 < buf.len() {
            i += 2;
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}

fn markup_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            4 => any::<u8>(),
            2 => Just(b'&'),
            1 => prop::sample::select(vec![b'L', b'C', b'R', b'U']),
        ],
        0..256,
    )
}

proptest! {
    #[test]
    fn prop_blocks_partition_the_buffer(buf in markup_bytes()) {
        let parser = StatusParser::new(b'&', usize::MAX);
        let status = parser.parse(&buf).unwrap();

        let mut rebuilt = Vec::new();
        for block in status.blocks_by_offset() {
            prop_assert!(!block.is_empty());
            prop_assert!(block.start + block.len <= buf.len());
            rebuilt.extend_from_slice(status.text(&block));
        }
        prop_assert_eq!(rebuilt, strip_directives(&buf));
    }

    #[test]
    fn prop_directive_free_input_is_one_left_block(
        buf in prop::collection::vec(any::<u8>().prop_filter("no sentinel", |b| *b != b'&'), 1..256)
    ) {
        let status = StatusParser::default().parse(&buf).unwrap();
        prop_assert_eq!(status.block_count(), 1);
        prop_assert_eq!(lane_texts(&status, Lane::Left), vec![&buf[..]]);
    }

    #[test]
    fn prop_lane_counts_respect_capacity(buf in markup_bytes(), cap in 1usize..8) {
        let unbounded = StatusParser::new(b'&', usize::MAX).parse(&buf).unwrap();
        let overflowing = Lane::ALL
            .into_iter()
            .find(|&lane| unbounded.lane(lane).len() > cap);

        match StatusParser::new(b'&', cap).parse(&buf) {
            Ok(status) => {
                prop_assert_eq!(overflowing, None);
                prop_assert_eq!(&status, &unbounded);
            }
            Err(CapacityError::LaneOverflow { lane, capacity }) => {
                prop_assert_eq!(capacity, cap);
                prop_assert!(unbounded.lane(lane).len() > cap);
                prop_assert!(overflowing.is_some());
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    #[test]
    fn prop_one_text_command_per_block(buf in markup_bytes()) {
        let parser = StatusParser::new(b'&', usize::MAX);
        let status = parser.parse(&buf).unwrap();
        let frame = engine().layout(&status, ten_per_byte, 800.0);

        let texts = frame.iter().filter(|c| c.is_text()).count();
        prop_assert_eq!(texts, status.block_count());
    }
}
