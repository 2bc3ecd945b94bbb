use super::*;

fn down(x: f64, y: f64) -> DocPointer {
    DocPointer::Down(Point::new(x, y))
}

#[test]
fn pen_drag_previews_then_commits() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    assert_eq!(c.handle(down(1.0, 1.0), &texts), vec![ToolAction::PreviewStroke]);
    assert_eq!(
        c.handle(DocPointer::Move(Point::new(5.0, 5.0)), &texts),
        vec![ToolAction::PreviewStroke]
    );
    let out = c.handle(DocPointer::Up(Point::new(9.0, 9.0)), &texts);
    let [ToolAction::CommitStroke(s)] = out.as_slice() else {
        panic!("expected one commit, got {out:?}");
    };
    assert_eq!(s.kind, StrokeKind::Pen);
    assert_eq!(s.points.len(), 3);
    assert!(!c.is_dragging());
}

#[test]
fn zero_motion_drag_commits_a_dot() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    c.handle(down(4.0, 4.0), &texts);
    let out = c.handle(DocPointer::Up(Point::new(4.0, 4.0)), &texts);
    let [ToolAction::CommitStroke(s)] = out.as_slice() else {
        panic!("expected one commit");
    };
    assert!(s.is_dot());
}

#[test]
fn leave_ends_the_drag() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    c.set_tool(Tool::Eraser);
    c.handle(down(4.0, 4.0), &texts);
    let out = c.handle(DocPointer::Leave, &texts);
    assert!(matches!(
        out.as_slice(),
        [ToolAction::CommitStroke(Stroke { kind: StrokeKind::Eraser, .. })]
    ));
    assert!(c.handle(DocPointer::Leave, &texts).is_empty());
}

#[test]
fn move_without_drag_does_nothing() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    assert!(c.handle(DocPointer::Move(Point::new(1.0, 1.0)), &texts).is_empty());
}

#[test]
fn fill_uses_brush_color() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    c.set_tool(Tool::Fill);
    c.set_color(Rgb8::new(255, 0, 0));
    assert_eq!(
        c.handle(down(1.0, 1.0), &texts),
        vec![ToolAction::Fill(Rgb8::new(255, 0, 0))]
    );
    assert_eq!(c.recent_colors().as_slice()[0], Rgb8::new(255, 0, 0));
}

#[test]
fn pending_text_hit_starts_text_drag_for_any_tool() {
    let mut c = InteractionController::new();
    let mut texts = TextStore::new();
    texts
        .place("hi", Point::new(10.0, 10.0), Rgb8::BLACK, 20.0)
        .unwrap();

    c.set_tool(Tool::Fill);
    assert!(c.handle(down(12.0, 12.0), &texts).is_empty());
    assert_eq!(
        c.handle(DocPointer::Move(Point::new(15.0, 20.0)), &texts),
        vec![ToolAction::MoveText(Vec2::new(3.0, 8.0))]
    );
    assert_eq!(
        c.handle(DocPointer::Up(Point::new(16.0, 20.0)), &texts),
        vec![ToolAction::MoveText(Vec2::new(1.0, 0.0))]
    );
}

#[test]
fn switching_tool_mid_stroke_commits_it() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    c.handle(down(1.0, 1.0), &texts);
    let out = c.set_tool(Tool::Text);
    assert!(matches!(out.as_slice(), [ToolAction::CommitStroke(_)]));
    assert_eq!(c.tool(), Tool::Text);
    assert!(c.handle(down(1.0, 1.0), &texts).is_empty());
}

#[test]
fn non_finite_positions_never_start_or_extend_a_stroke() {
    let mut c = InteractionController::new();
    let texts = TextStore::new();
    assert!(c.handle(down(f64::NAN, f64::NAN), &texts).is_empty());
    assert!(!c.is_dragging());
    assert!(c.handle(DocPointer::Up(Point::new(f64::NAN, f64::NAN)), &texts).is_empty());

    c.handle(down(2.0, 2.0), &texts);
    assert!(c.handle(DocPointer::Move(Point::new(f64::INFINITY, 3.0)), &texts).is_empty());
    let out = c.handle(DocPointer::Up(Point::new(3.0, f64::NAN)), &texts);
    let [ToolAction::CommitStroke(s)] = out.as_slice() else {
        panic!("expected one commit, got {out:?}");
    };
    assert_eq!(s.points, vec![Point::new(2.0, 2.0)]);
}
