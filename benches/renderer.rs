use chord_grid::config::{DisplayMode, RenderOptions};
use chord_grid::resolve::Resolver;
use chord_grid::service::{ConfigStore, DiagramService, StoreSources};
use chord_grid::store::{TemplateImage, TemplateStore};
use chord_grid::table::{ChordRow, ChordTable};
use chord_grid::value::RawValue;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::PathBuf;

fn synthetic_store(positions: usize) -> TemplateStore {
    let mut template = String::from("{\"crop_rects\":{\"R\":{\"x\":100,\"y\":50,\"width\":400,\"height\":300}},\"frets\":{\"R\":{\"x\":110,\"y\":60,\"symbol\":\"I\"}");
    for i in 0..positions {
        template.push_str(&format!(
            ",\"{i}LAD\":{{\"x\":{},\"y\":90,\"symbol\":\"V\"}}",
            120 + i * 10
        ));
    }
    template.push_str("},\"barres\":{\"B\":{\"x\":300,\"y\":200,\"width\":120,\"height\":30,\"style\":\"orange_glow\"}},\"notes\":{");
    for i in 0..positions {
        if i > 0 {
            template.push(',');
        }
        template.push_str(&format!(
            "\"N{i}\":{{\"x\":{},\"y\":160,\"radius\":10,\"style\":\"wood\",\"finger\":\"{}\"}}",
            130 + i * 10,
            i % 4 + 1
        ));
    }
    template.push_str("}}");
    TemplateStore::from_json_str(&template).expect("synthetic template")
}

fn synthetic_table(positions: usize) -> ChordTable {
    let lad: Vec<String> = (0..positions).map(|i| i.to_string()).collect();
    let mut table = format!(
        "{{\"chords\":[],\"ram\":[{{\"RAM\":\"R\",\"LAD\":\"{}\"}}],\"note\":[",
        lad.join(",")
    );
    for i in 0..positions {
        if i > 0 {
            table.push(',');
        }
        table.push_str(&format!("{{\"FP1\":\"{i}\",\"FP1_ELEM\":\"N{i}\"}}"));
    }
    table.push_str("]}");
    ChordTable::from_json_str(&table).expect("synthetic table")
}

fn chord_row(token: usize) -> ChordRow {
    ChordRow {
        ram: Some(RawValue::text("R")),
        bar: Some(RawValue::text("B")),
        fp1: Some(RawValue::text(&token.to_string())),
        ..Default::default()
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for positions in [8usize, 32, 128] {
        let templates = synthetic_store(positions);
        let table = synthetic_table(positions);
        let row = chord_row(positions / 2);
        group.bench_with_input(
            BenchmarkId::from_parameter(positions),
            &positions,
            |b, _| {
                let resolver = Resolver::new(&templates, &table);
                b.iter(|| {
                    let resolution = resolver.resolve(black_box(&row), DisplayMode::Fingers);
                    black_box(resolution.elements.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    for positions in [8usize, 32, 128] {
        let image = TemplateImage::new(1000, 800);
        let service = DiagramService::new(
            ConfigStore {
                templates: synthetic_store(positions),
                table: synthetic_table(positions),
                image: image.clone(),
            },
            StoreSources {
                template_path: PathBuf::new(),
                chord_path: PathBuf::new(),
                image,
            },
        );
        let row = chord_row(positions / 2);
        let options = RenderOptions::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(positions),
            &positions,
            |b, _| {
                b.iter(|| {
                    let svg = service
                        .render_chord(black_box(&row), DisplayMode::Fingers, &options)
                        .expect("render failed");
                    black_box(svg.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let image = TemplateImage::new(1000, 800);
    let mut table = synthetic_table(32);
    for i in 0..64 {
        let mut row = chord_row(i % 32);
        row.chord = Some(RawValue::text(&format!("C{}", (b'A' + (i % 7) as u8) as char)));
        row.variant = Some(RawValue::Number((i / 7 + 1) as f64));
        table.chords.push(row);
    }
    let service = DiagramService::new(
        ConfigStore {
            templates: synthetic_store(32),
            table,
            image: image.clone(),
        },
        StoreSources {
            template_path: PathBuf::new(),
            chord_path: PathBuf::new(),
            image,
        },
    );
    let options = RenderOptions::default();
    group.bench_function("bundle_64_chords", |b| {
        b.iter(|| {
            let bundle = service.export_configuration(black_box(&options));
            black_box(bundle.metadata.total_chords);
        });
    });
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_resolve, bench_render, bench_export
);
criterion_main!(benches);
