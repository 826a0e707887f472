use crate::db::rrgraph::{RrGraph, RrNodeKind};
use crate::geom::coord::Axis;
use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

/// Draws channel occupancy per grid position: red scales with X tracks used
/// against the X channel width, blue with Y tracks against the Y width.
pub fn draw_channel_usage(graph: &RrGraph, filename: &str, size: u32) -> ImageResult<()> {
    let mut img = RgbImage::from_pixel(size, size, Rgb([20, 20, 20]));

    if graph.width == 0 || graph.height == 0 {
        return img.save(Path::new(filename));
    }

    let cell = (size / graph.width.max(graph.height)).max(1);
    let mut used = vec![[0u32; 2]; (graph.width as usize) * (graph.height as usize)];
    for node in &graph.nodes {
        if let RrNodeKind::ChannelWire { axis, .. } = node.kind {
            let idx = (node.pos.y as usize) * (graph.width as usize) + node.pos.x as usize;
            if let Some(slot) = used.get_mut(idx) {
                slot[axis as usize] += 1;
            }
        }
    }

    let shade = |count: u32, axis: Axis| -> u8 {
        let width = graph.channel_width(axis);
        if width == 0 {
            return 30;
        }
        (30 + (225 * count.min(width)) / width) as u8
    };

    let grid_color = Rgb([60, 60, 60]);
    for y in 0..graph.height {
        for x in 0..graph.width {
            let [x_used, y_used] = used[(y as usize) * (graph.width as usize) + x as usize];
            let color = Rgb([shade(x_used, Axis::X), 30, shade(y_used, Axis::Y)]);
            // Row 0 at the bottom of the image.
            let top = (graph.height - 1 - y) * cell;
            let rect = ImageRect::at((x * cell) as i32, top as i32).of_size(cell, cell);
            draw_filled_rect_mut(&mut img, rect, color);
            if cell > 3 {
                draw_hollow_rect_mut(&mut img, rect, grid_color);
            }
        }
    }

    img.save(Path::new(filename))
}
