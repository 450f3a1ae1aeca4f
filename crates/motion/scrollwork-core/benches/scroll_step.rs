use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrollwork_core::effects::divider::{self, DividerCfg};
use scrollwork_core::effects::filmstrip::{self, FilmstripCfg, FilmstripElements};
use scrollwork_core::{
    config::Config, ElementBox, ElementId, Engine, HostEvent, Inputs, Rect, Viewport,
};

fn page(dividers: u32) -> Engine {
    let mut engine = Engine::with_viewport(
        Config::default(),
        Viewport {
            width: 1280.0,
            height: 1000.0,
            scroll_y: 0.0,
        },
    );
    let mut inputs = Inputs::new();
    for i in 0..dividers {
        inputs = inputs.with(HostEvent::Mount {
            element: ElementId(i),
            layout: ElementBox::from_rect(Rect::new(0.0, i as f32 * 400.0, 1280.0, 80.0)),
        });
    }
    let frame = ElementId(10_000);
    let strip = ElementId(10_001);
    inputs = inputs
        .with(HostEvent::Mount {
            element: frame,
            layout: ElementBox::from_rect(Rect::new(0.0, 2000.0, 1280.0, 1000.0)),
        })
        .with(HostEvent::Mount {
            element: strip,
            layout: ElementBox {
                rect: Rect::new(0.0, 2100.0, 4000.0, 600.0),
                scroll_width: 4000.0,
                client_width: 4000.0,
            },
        });
    engine.update(0.0, inputs).expect("mount");

    for i in 0..dividers {
        engine
            .register_section(divider::drift_section(DividerCfg::default(), ElementId(i)))
            .expect("divider");
    }
    let spec = filmstrip::section(
        engine.config(),
        FilmstripCfg::default(),
        FilmstripElements {
            container: frame,
            frame,
            strip,
            background: None,
        },
    );
    engine.register_section(spec).expect("filmstrip");
    engine
}

fn scroll_step_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_step");
    for count in [10u32, 100, 500] {
        let mut engine = page(count);
        let mut y = 0.0f32;
        group.bench_function(format!("{count}_dividers"), |b| {
            b.iter(|| {
                y = (y + 37.0) % (count as f32 * 400.0 + 2000.0);
                let out = engine
                    .update(1.0 / 60.0, Inputs::new().with(HostEvent::Scroll { y }))
                    .expect("update");
                black_box(out.changes.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, scroll_step_benchmark);
criterion_main!(benches);
