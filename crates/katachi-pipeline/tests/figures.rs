//! Integration test: draw each figure kind onto a canvas, encode it, and
//! classify the encoded bytes through the full pipeline.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use katachi_pipeline::{AnalysisConfig, Classification, Label, process};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("encoding should succeed");
    buf
}

fn classify(img: &RgbaImage) -> Classification {
    process(&encode(img, ImageFormat::Png), &AnalysisConfig::default())
        .expect("pipeline should succeed")
}

#[test]
fn blank_canvas() {
    let c = classify(&canvas(16, 16));
    assert_eq!(c.label, Label::Blank);
    assert_eq!(c.corner_count, 0);
}

#[test]
fn circle_is_ellipse() {
    let mut img = canvas(33, 33);
    draw_hollow_circle_mut(&mut img, (16, 16), 10, BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::Ellipse);
    assert_eq!(c.corner_count, 0);
    assert_eq!(c.dimensions.width, 33);
}

#[test]
fn rectangle() {
    let mut img = canvas(24, 20);
    draw_hollow_rect_mut(&mut img, Rect::at(5, 5).of_size(10, 8), BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::Rectangle);
    assert_eq!(c.corner_count, 4);
}

#[test]
fn smallest_rectangle_with_four_corners() {
    let mut img = canvas(16, 16);
    draw_hollow_rect_mut(&mut img, Rect::at(5, 5).of_size(6, 6), BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::Rectangle);
    assert_eq!(c.corner_count, 4);
}

#[test]
fn five_pixel_rectangle_loses_corners() {
    // The top-left match erases cells the top-right and bottom-left
    // windows need.
    let mut img = canvas(16, 16);
    draw_hollow_rect_mut(&mut img, Rect::at(5, 5).of_size(5, 5), BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::UnknownClosed);
    assert_eq!(c.corner_count, 2);
}

#[test]
fn right_triangle() {
    // Legs of seven pixels along the left and bottom, joined by a 45
    // degree hypotenuse.
    let mut img = canvas(12, 12);
    for i in 0..7 {
        img.put_pixel(2, 2 + i, BLACK);
        img.put_pixel(2 + i, 8, BLACK);
        img.put_pixel(2 + i, 2 + i, BLACK);
    }

    let c = classify(&img);
    assert_eq!(c.label, Label::Triangle);
    assert_eq!(c.corner_count, 3);
}

#[test]
fn edge_to_edge_line() {
    let mut img = canvas(30, 20);
    draw_line_segment_mut(&mut img, (0.0, 10.0), (29.0, 10.0), BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::LineOrCurve);
    assert_eq!(c.corner_count, 0);
}

#[test]
fn bent_line_is_polyline() {
    let mut img = canvas(20, 20);
    draw_line_segment_mut(&mut img, (5.0, 5.0), (5.0, 15.0), BLACK);
    draw_line_segment_mut(&mut img, (5.0, 15.0), (15.0, 15.0), BLACK);

    let c = classify(&img);
    assert_eq!(c.label, Label::PolylineOrPolycurve);
    assert_eq!(c.corner_count, 1);
}

#[test]
fn bmp_input_matches_png() {
    let mut img = canvas(24, 20);
    draw_hollow_rect_mut(&mut img, Rect::at(5, 5).of_size(10, 8), BLACK);

    let config = AnalysisConfig::default();
    let from_png = process(&encode(&img, ImageFormat::Png), &config).unwrap();
    let from_bmp = process(&encode(&img, ImageFormat::Bmp), &config).unwrap();
    assert_eq!(from_png, from_bmp);
}
