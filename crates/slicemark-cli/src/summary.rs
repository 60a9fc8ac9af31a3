use console::Style;
use slicemark_core::session::Session;
use slicemark_core::workspace::LoadReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    on: Style,
    off: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            on: Style::new().green(),
            off: Style::new().dim().yellow(),
            warn: Style::new().red(),
        }
    }
}

pub fn print_workspace_summary(session: &Session, report: &LoadReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Slicemark Workspace"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(19)));
    println!();

    if let Some(base) = session.base() {
        let (min, max) = base.intensity_range();
        let (sx, sy) = base.spacing();
        let (ox, oy) = base.origin();
        println!("  {}", s.header.apply_to("Image"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Size"),
            s.value.apply_to(format!("{}x{} px", base.width(), base.height()))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Spacing"),
            s.value.apply_to(format!("{sx} x {sy} mm/px"))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Origin"),
            s.value.apply_to(format!("({ox}, {oy})"))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Intensity"),
            s.value.apply_to(format!("{min}..{max}"))
        );
        let window = session.window();
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.value
                .apply_to(format!("L {} / W {}", window.level, window.width))
        );
        println!();
    }

    let store = &session.store;

    println!("  {}", s.header.apply_to("Segmentation layers"));
    if store.segmentations().is_empty() {
        println!("    {}", s.off.apply_to("none"));
    }
    for layer in store.segmentations() {
        let visibility = if layer.visible {
            s.on.apply_to("visible")
        } else {
            s.off.apply_to("hidden")
        };
        println!(
            "    {:<16}{:>8} px  rgb({}, {}, {})  alpha {:.2}  {}",
            s.value.apply_to(&layer.name),
            layer.mask.count_nonzero(),
            layer.color.0[0],
            layer.color.0[1],
            layer.color.0[2],
            layer.alpha(),
            visibility
        );
    }
    println!();

    if !store.points().is_empty() {
        println!("  {}", s.header.apply_to("Points"));
        for p in store.points() {
            println!(
                "    {:<16}({}, {})",
                s.value.apply_to(&p.name),
                p.position.x,
                p.position.y
            );
        }
        println!();
    }

    if !store.lines().is_empty() {
        println!("  {}", s.header.apply_to("Lines"));
        for l in store.lines() {
            println!(
                "    {:<16}{:.2} mm",
                s.value.apply_to(&l.name),
                l.length()
            );
        }
        println!();
    }

    if !store.rects().is_empty() {
        println!("  {}", s.header.apply_to("Rectangles"));
        for r in store.rects() {
            println!(
                "    {:<16}{:.2} x {:.2} mm",
                s.value.apply_to(&r.name),
                r.width(),
                r.height()
            );
        }
        println!();
    }

    if !report.skipped.is_empty() {
        println!("  {}", s.warn.apply_to("Skipped layers"));
        for failure in &report.skipped {
            println!(
                "    {:<16}{}",
                s.value.apply_to(&failure.name),
                s.warn.apply_to(&failure.reason)
            );
        }
        println!();
    }
}
