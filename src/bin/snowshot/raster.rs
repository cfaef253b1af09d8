// raster.rs - Draw a snapshot into an RGBA image
//
// Trees are flat triangles, flakes are soft discs. Good enough to eyeball a
// layout; real sprites are the host renderer's job.

use image::{Rgba, RgbaImage};

use snowfall_engine::{FlakeView, Prop};

const SKY: Rgba<u8> = Rgba([14, 22, 44, 255]);
const TREE: Rgba<u8> = Rgba([28, 92, 52, 255]);
const TRUNK: Rgba<u8> = Rgba([82, 54, 30, 255]);

// On-screen flake radius at size_scale 1.0, per visual variant
const FLAKE_RADIUS: [f32; 4] = [2.0, 2.5, 3.0, 3.5];

pub fn draw(w: u32, h: u32, props: &[Prop], flakes: impl Iterator<Item = FlakeView>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(w, h, SKY);

    for p in props {
        draw_tree(&mut img, p);
    }
    for f in flakes {
        let r = FLAKE_RADIUS[f.variant as usize % FLAKE_RADIUS.len()] * f.size_scale;
        draw_disc(&mut img, f.x, f.y, r);
    }
    img
}

fn draw_tree(img: &mut RgbaImage, p: &Prop) {
    let (rw, rh) = (p.rendered_width(), p.rendered_height());
    let cx = p.x + rw * 0.5;
    let trunk_h = rh * 0.15;
    let crown_h = rh - trunk_h;

    // Crown: triangle from apex at the top down to full width
    for dy in 0..crown_h as i32 {
        let half = rw * 0.5 * (dy as f32 / crown_h);
        let y = p.y as i32 + dy;
        for x in (cx - half) as i32..=(cx + half) as i32 {
            put(img, x, y, TREE);
        }
    }

    // Trunk
    let trunk_half = (rw * 0.08).max(1.0);
    for dy in 0..trunk_h as i32 {
        let y = (p.y + crown_h) as i32 + dy;
        for x in (cx - trunk_half) as i32..=(cx + trunk_half) as i32 {
            put(img, x, y, TRUNK);
        }
    }
}

fn draw_disc(img: &mut RgbaImage, cx: f32, cy: f32, r: f32) {
    let r2 = r * r;
    for y in (cy - r) as i32..=(cy + r) as i32 {
        for x in (cx - r) as i32..=(cx + r) as i32 {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let d2 = dx * dx + dy * dy;
            if d2 > r2 { continue; }

            let a = (255.0 * (1.0 - d2 / r2).sqrt()) as u8;
            blend(img, x, y, a);
        }
    }
}

#[inline]
fn put(img: &mut RgbaImage, x: i32, y: i32, c: Rgba<u8>) {
    if (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, c);
    }
}

// White over whatever is there
#[inline]
fn blend(img: &mut RgbaImage, x: i32, y: i32, a: u8) {
    if (x as u32) >= img.width() || (y as u32) >= img.height() { return; }

    let px = img.get_pixel_mut(x as u32, y as u32);
    let a = a as u16;
    for c in 0..3 {
        px.0[c] = ((px.0[c] as u16 * (255 - a) + 255 * a) / 255) as u8;
    }
}
