use std::hint::black_box;

use cl_geometry::marker::sv_preview;
use cl_render::canvas::render_frame;
use criterion::{Criterion, criterion_group, criterion_main};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

fn bench_render_frame(c: &mut Criterion) {
    let fb = sv_preview(200.0, 256);
    let area = Rect::new(0, 0, 200, 60);
    let mut buf = Buffer::empty(area);
    c.bench_function("render_frame_200x60", |b| {
        b.iter(|| render_frame(black_box(&mut buf), area, black_box(&fb)));
    });
}

criterion_group!(benches, bench_render_frame);
criterion_main!(benches);
