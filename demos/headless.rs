use nomoplot::{
    ChartCatalog, CurveRenderer, ExprParser, FitConfig, NomographError, PanGesture, Point, Range,
    RenderCommand, RenderConfig, RenderList, Theme, TickKind, TickSet, Viewport, zoom_at,
};

fn main() -> Result<(), NomographError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    let catalog = ChartCatalog::builtin();
    let parser = ExprParser::with_variable("x");
    let Some(chart) = catalog.get("Z-Chart") else {
        return Ok(());
    };
    println!("{}: {}", chart.name, chart.description);

    let formulas = ["x", "x^2", "sqrt(x)"]
        .iter()
        .map(|text| nomoplot::FormulaParser::parse(&parser, text))
        .collect::<Result<Vec<_>, _>>()?;
    let mut model = chart.build(formulas)?;
    for scale in 0..model.scale_count() {
        model.set_ticks(scale, TickSet::linear(1.0, 4.0, 1.0, 0.25))?;
    }

    let screen = Viewport::new(Range::new(0.0, 800.0), Range::new(0.0, 600.0));
    model.fit_to(screen, &FitConfig::default());

    let mut pan = PanGesture::new();
    pan.press(Point::new(400.0, 300.0));
    pan.drag(&mut model, Point::new(420.0, 310.0));
    pan.release(&mut model);
    zoom_at(&mut model, Point::new(400.0, 300.0), 0.9);

    let renderer = CurveRenderer::new(RenderConfig::default().with_tick_size(3.0));
    let mut list = RenderList::with_theme(Theme::dark());
    renderer.draw(&model, &mut list, None)?;

    for scale in 0..model.scale_count() {
        let tag = CurveRenderer::tag(scale);
        let mut polylines = 0;
        let mut majors = 0;
        let mut labels = Vec::new();
        for command in list.commands_for(&tag) {
            match command {
                RenderCommand::Polyline { .. } => polylines += 1,
                RenderCommand::Tick { kind: TickKind::Major, .. } => majors += 1,
                RenderCommand::Tick { .. } => {}
                RenderCommand::Label { text, .. } => labels.push(text.as_str()),
            }
        }
        println!(
            "{tag} [{}]: {polylines} polyline(s), {majors} major ticks, labels {}",
            model.formula(scale)?,
            labels.join(" ")
        );
    }
    Ok(())
}
