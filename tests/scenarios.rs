use nomoplot::{
    ChartVariant, CurveRenderer, ExprParser, FitConfig, Formula, NomographError, NomographModel,
    Point, Range, RenderCommand, RenderList, TickSet, TransformMatrix, Viewport,
};

fn model(variant: ChartVariant) -> NomographModel {
    NomographModel::new(variant, vec![Formula::identity(); 3]).unwrap()
}

fn assert_point(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn parallel_chart_at_unit_parameter() {
    let model = model(ChartVariant::Parallel);
    assert_point(model.point_at(0, 1.0).unwrap(), Point::new(1.0, 0.0));
    assert_point(model.point_at(1, 1.0).unwrap(), Point::new(1.0, 1.0));
    assert_point(model.point_at(2, 1.0).unwrap(), Point::new(0.5, 0.5));
}

#[test]
fn recompute_is_idempotent() {
    let mut model = model(ChartVariant::ZChart);
    model.project(0.2, 0.3, 1.0);
    model.commit();
    model.rotate_degrees(30.0);
    let first = model.current_matrix().clone();
    model.recompute();
    assert_eq!(model.current_matrix(), &first);
    for t in [0.0, 0.25, 0.5, 1.0] {
        for (a, b) in first.rows().iter().zip(model.current_matrix().rows()) {
            let (pa, pb) = (a.point_at(t), b.point_at(t));
            assert_eq!(pa.x.to_bits(), pb.x.to_bits());
            assert_eq!(pa.y.to_bits(), pb.y.to_bits());
        }
    }
}

#[test]
fn sequential_commits_match_single_product() {
    let a = TransformMatrix::rotate(0.4);
    let b = TransformMatrix::translate(3.0, -2.0);

    let mut stepwise = model(ChartVariant::Concurrent);
    stepwise.propose(a);
    stepwise.commit();
    stepwise.propose(b);
    stepwise.commit();

    let mut once = model(ChartVariant::Concurrent);
    once.propose(a.compose(&b));
    once.commit();

    for scale in 0..3 {
        for t in [0.0, 0.3, 1.0] {
            assert_point(
                stepwise.point_at(scale, t).unwrap(),
                once.point_at(scale, t).unwrap(),
            );
        }
    }
}

#[test]
fn scale_about_point_keeps_it_fixed() {
    let mut model = model(ChartVariant::Parallel);
    // scale 1 passes through (0.4, 1) at t = 0.4
    let pivot = model.point_at(1, 0.4).unwrap();
    model.scale_about(3.0, 0.25, pivot.x, pivot.y);
    model.commit();
    assert_point(model.point_at(1, 0.4).unwrap(), pivot);
    assert_point(model.point_at(1, 1.0).unwrap(), Point::new(2.2, 1.0));
}

#[test]
fn topology_switch_keeps_formulas() {
    let mut parallel = model(ChartVariant::Parallel);
    parallel
        .set_formula_text(0, "t^2", &ExprParser::new())
        .unwrap();
    parallel.set_range(0, 0.0, 3.0).unwrap();

    let z = parallel.convert_to(ChartVariant::ZChart).unwrap();
    assert_eq!(z.variant(), ChartVariant::ZChart);
    assert_eq!(z.formula(0).unwrap().source(), "t^2");
    assert_eq!(z.ticks(0).unwrap().max(), 3.0);
    // scale 0 of a Z chart is [0, f, 1]
    assert_point(z.point_at(0, 2.0).unwrap(), Point::new(0.0, 4.0));
}

#[test]
fn copy_state_requires_matching_scale_count() {
    let mut target = model(ChartVariant::ZChart);
    let mut source = model(ChartVariant::Parallel);
    source.translate(1.0, 1.0);
    source.commit();
    target.copy_state_from(&source).unwrap();
    assert_eq!(target.committed_transform(), source.committed_transform());
    assert!(matches!(
        target.set_base_matrix(nomoplot::CellMatrix::default()),
        Err(NomographError::ScaleCountMismatch { expected: 3, found: 0 })
    ));
}

#[test]
fn ticks_terminate_exactly_at_max() {
    let ticks = TickSet::linear(0.0, 1.0, 0.3, 0.1);
    let major = ticks.major_ticks();
    let expected = [0.0, 0.3, 0.6, 0.9, 1.0];
    assert_eq!(major.len(), expected.len());
    for (value, want) in major.iter().zip(expected) {
        assert!((value - want).abs() < 1e-12);
    }
    assert_eq!(*major.last().unwrap(), 1.0);

    let (major, minor) = ticks.all_ticks();
    for m in &minor {
        assert!(major.iter().all(|v| (v - m).abs() > 1e-9), "{m} collides");
    }
}

#[test]
fn fitted_chart_renders_inside_target() {
    let mut model = model(ChartVariant::ZChart);
    let target = Viewport::new(Range::new(0.0, 640.0), Range::new(0.0, 480.0));
    assert!(model.fit_to(target, &FitConfig::default()));

    let mut list = RenderList::new();
    CurveRenderer::default().draw(&model, &mut list, None).unwrap();
    for command in list.commands() {
        if let RenderCommand::Polyline { points, .. } = command {
            for p in points {
                assert!(p.x >= -1e-6 && p.x <= 640.0 + 1e-6, "{p:?}");
                assert!(p.y >= -1e-6 && p.y <= 480.0 + 1e-6, "{p:?}");
            }
        }
    }
}

#[test]
fn failed_formula_edit_keeps_previous_geometry() {
    let mut model = model(ChartVariant::Parallel);
    let before = model.point_at(0, 0.5).unwrap();
    let err = model
        .set_formula_text(0, "foo(t)", &ExprParser::new())
        .unwrap_err();
    assert!(matches!(err, NomographError::Formula(_)));
    assert_eq!(model.point_at(0, 0.5).unwrap(), before);
}
