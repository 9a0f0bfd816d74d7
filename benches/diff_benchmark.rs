//! Diffing engine benchmark: measure frame diff performance.
//!
//! Target: < 500µs for a 200×50 frame

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weft::buffer::diff::{render_diff, render_full, DiffState};
use weft::{Cell, Color, FrameBuffer, Style};

/// Create a frame with varied content for benchmarking.
fn create_test_frame(width: u16, height: u16, seed: u8) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = ((x + y + u16::from(seed)) % 26 + 65) as u8 as char; // A-Z
            let style = Style::DEFAULT
                .with_fg(Color::Rgb(
                    ((x * 3 + u16::from(seed)) % 256) as u8,
                    ((y * 7 + u16::from(seed)) % 256) as u8,
                    ((x + y + u16::from(seed)) % 256) as u8,
                ))
                .with_bg(Color::Rgb(20, 20, 30));
            frame.set(x, y, Cell::styled(c, style));
        }
    }
    frame
}

fn diff_identical_frames(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);
    let frame_clone = frame.clone();

    c.bench_function("diff_200x50_identical", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(
                black_box(&frame),
                black_box(&frame_clone),
                &mut output,
                &mut state,
            )
        })
    });
}

fn diff_single_cell_change(c: &mut Criterion) {
    let frame_a = create_test_frame(200, 50, 0);
    let mut frame_b = frame_a.clone();
    frame_b.set(100, 25, Cell::styled('X', Style::fg(Color::RED)));

    c.bench_function("diff_200x50_single_change", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(
                black_box(&frame_a),
                black_box(&frame_b),
                &mut output,
                &mut state,
            )
        })
    });
}

fn diff_many_changes(c: &mut Criterion) {
    let frame_a = create_test_frame(200, 50, 0);
    let frame_b = create_test_frame(200, 50, 1); // different seed, different content

    c.bench_function("diff_200x50_full_change", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(65536);
            let mut state = DiffState::new();
            render_diff(
                black_box(&frame_a),
                black_box(&frame_b),
                &mut output,
                &mut state,
            )
        })
    });
}

fn diff_line_change(c: &mut Criterion) {
    let frame_a = create_test_frame(200, 50, 0);
    let mut frame_b = frame_a.clone();
    for x in 0..200 {
        frame_b.set(x, 25, Cell::styled('*', Style::fg(Color::YELLOW)));
    }

    c.bench_function("diff_200x50_line_change", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(
                black_box(&frame_a),
                black_box(&frame_b),
                &mut output,
                &mut state,
            )
        })
    });
}

fn full_repaint(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);

    c.bench_function("render_full_200x50", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(65536);
            let mut state = DiffState::new();
            render_full(black_box(&frame), &mut output, &mut state)
        })
    });
}

fn diff_various_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let frame_a = create_test_frame(width, height, 0);
        let frame_b = create_test_frame(width, height, 1);

        group.bench_with_input(
            BenchmarkId::new("full_change", format!("{width}x{height}")),
            &(frame_a, frame_b),
            |b, (a, bb)| {
                b.iter(|| {
                    let mut output = Vec::with_capacity(65536);
                    let mut state = DiffState::new();
                    render_diff(black_box(a), black_box(bb), &mut output, &mut state)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    diff_identical_frames,
    diff_single_cell_change,
    diff_many_changes,
    diff_line_change,
    full_repaint,
    diff_various_sizes,
);
criterion_main!(benches);
