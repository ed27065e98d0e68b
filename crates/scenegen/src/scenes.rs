//! The three built-in scenes: the hexagonal logo that gets morphed, and two
//! environments that get sampled into the background point cloud.

use crate::primitives::{
    cuboid, cylinder, height_field, pipe, quad, sphere, tetrahedron, Face, Shape,
};
use clap::ValueEnum;
use glam::{vec3, Vec2, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Ground level shared by both environments.
const FLOOR_Y: f32 = -3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Compound hexagonal prism (object mesh).
    Logo,
    /// Blocky industrial city (environment mesh).
    Metropolis,
    /// Rolling terrain with trees, rocks and grass (environment mesh).
    Grove,
}

impl SceneKind {
    /// First comment line of the written OBJ.
    pub fn title(self) -> &'static str {
        match self {
            SceneKind::Logo => "hexagonal logo",
            SceneKind::Metropolis => "silicon metropolis",
            SceneKind::Grove => "grove environment",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            SceneKind::Logo => "logo.obj",
            SceneKind::Metropolis => "metropolis.obj",
            SceneKind::Grove => "grove.obj",
        }
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Shape {
        match self {
            SceneKind::Logo => logo(),
            SceneKind::Metropolis => metropolis(rng),
            SceneKind::Grove => grove(rng),
        }
    }
}

fn face(indices: &[u32]) -> Face {
    Face::from_slice(indices)
}

/// Hexagonal ring prism. Inner caps are written as 6-gons.
pub fn logo() -> Shape {
    const SIDES: u32 = 6;
    const OUTER_RADIUS: f32 = 1.0;
    const INNER_RADIUS: f32 = 0.55;
    const HALF_HEIGHT: f32 = 0.35;
    let offset = -PI / 6.0;

    let ring = |radius: f32, y: f32| {
        (0..SIDES).map(move |i| {
            let a = TAU / SIDES as f32 * i as f32 + offset;
            vec3(a.cos() * radius, y, a.sin() * radius)
        })
    };

    // outer top, outer bottom, inner top, inner bottom
    let vertices: Vec<Vec3> = ring(OUTER_RADIUS, HALF_HEIGHT)
        .chain(ring(OUTER_RADIUS, -HALF_HEIGHT))
        .chain(ring(INNER_RADIUS, HALF_HEIGHT))
        .chain(ring(INNER_RADIUS, -HALF_HEIGHT))
        .collect();

    let n = SIDES;
    let (inner_top, inner_bottom) = (2 * n, 3 * n);
    let mut faces = Vec::with_capacity(4 * n as usize + 2);
    let bands = [
        (0, n),
        (inner_top, inner_bottom),
        (0, inner_top),
        (n, inner_bottom),
    ];
    for (a, b) in bands {
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(face(&[a + i, a + j, b + j, b + i]));
        }
    }
    faces.push((inner_top..inner_top + n).collect());
    faces.push((inner_bottom..inner_bottom + n).collect());

    Shape { vertices, faces }
}

const TOWER_SPOTS: [(f32, f32); 16] = [
    (-7.0, -2.0),
    (-8.0, 2.0),
    (-6.0, 6.0),
    (-5.0, -7.0),
    (6.0, -3.0),
    (8.0, 1.0),
    (7.0, 5.0),
    (5.0, -8.0),
    (-10.0, 0.0),
    (10.0, -1.0),
    (-3.0, 9.0),
    (3.0, -10.0),
    (-9.0, -6.0),
    (9.0, 7.0),
    (-11.0, 4.0),
    (11.0, -5.0),
];

/// `(x0, z0, x1, z1, deck height)`
const BRIDGES: [(f32, f32, f32, f32, f32); 5] = [
    (-5.0, -3.0, 5.0, -3.0, 3.5),
    (-4.0, 4.0, 4.0, 4.0, 4.0),
    (-3.0, -7.0, 3.0, -7.0, 2.5),
    (-7.0, -1.0, -7.0, 6.0, 3.0),
    (7.0, -4.0, 7.0, 3.0, 3.5),
];

/// `(radius, height, thickness)` of the broken ring walls.
const RING_WALLS: [(f32, f32, f32); 3] = [(4.5, 1.2, 0.15), (6.0, 0.8, 0.12), (8.0, 0.5, 0.1)];

/// One arc block of a ring wall between angles `a0` and `a1`.
fn ring_wall_block(radius: f32, height: f32, thickness: f32, a0: f32, a1: f32) -> Shape {
    let at = |r: f32, a: f32, y: f32| vec3(a.cos() * r, y, a.sin() * r);
    let inner = radius - thickness;
    let (lo, hi) = (FLOOR_Y, FLOOR_Y + height);
    let vertices = vec![
        at(radius, a0, lo),
        at(radius, a1, lo),
        at(radius, a1, hi),
        at(radius, a0, hi),
        at(inner, a0, lo),
        at(inner, a1, lo),
        at(inner, a1, hi),
        at(inner, a0, hi),
    ];
    let faces = [
        [0u32, 1, 2, 3],
        [5, 4, 7, 6],
        [0, 4, 5, 1],
        [2, 6, 7, 3],
        [0, 3, 7, 4],
        [1, 5, 6, 2],
    ]
    .iter()
    .map(|f| face(f))
    .collect();
    Shape { vertices, faces }
}

pub fn metropolis<R: Rng + ?Sized>(rng: &mut R) -> Shape {
    let mut scene = height_field(Vec2::splat(-14.0), Vec2::splat(14.0), (24, 24), |x, z| {
        FLOOR_Y + 0.15 * (x * 0.3).sin() * (z * 0.25).cos() + 0.08 * (x * 0.8 + z * 0.6).sin()
    });

    // Central stacked blocks.
    for (y, half) in [
        (0.8, vec3(3.0, 0.8, 2.5)),
        (2.0, vec3(2.5, 0.4, 2.0)),
        (3.0, vec3(2.0, 0.6, 1.6)),
        (3.7, vec3(2.2, 0.08, 1.8)),
    ] {
        scene.merge(cuboid(vec3(0.0, FLOOR_Y + y, 0.0), half));
    }

    // Rooftop units.
    for row in 0..3 {
        for col in 0..5 {
            let x = -1.5 + col as f32 * 0.75;
            let z = -0.9 + row as f32 * 0.9;
            let h = 0.25 + rng.gen::<f32>() * 0.4;
            scene.merge(cuboid(vec3(x, FLOOR_Y + 3.6 + h, z), vec3(0.28, h, 0.32)));
            scene.merge(cuboid(
                vec3(x, FLOOR_Y + 3.6 + h * 2.0 + 0.05, z),
                vec3(0.12, 0.05, 0.15),
            ));
        }
    }

    // Long walls with buttresses and pillars.
    for side in [-1.0f32, 1.0] {
        let wall_z = side * 5.0;
        scene.merge(cuboid(vec3(0.0, FLOOR_Y + 2.5, wall_z), vec3(10.0, 2.5, 0.3)));
        for i in 0..8 {
            let x = -8.0 + i as f32 * 2.3 + rng.gen_range(-0.3f32..0.3);
            let h = 1.5 + rng.gen::<f32>() * 2.5;
            scene.merge(cuboid(
                vec3(x, FLOOR_Y + h, wall_z + side * 0.5),
                vec3(0.6, h, 0.25),
            ));
        }
        for i in 0..12 {
            let x = -10.0 + i as f32 * 1.8 + rng.gen_range(-0.2f32..0.2);
            let h = 2.0 + rng.gen::<f32>() * 3.0;
            let r = 0.15 + rng.gen::<f32>() * 0.15;
            scene.merge(cylinder(vec3(x, FLOOR_Y, wall_z + side * 1.2), r, h, 8));
        }
    }

    // Towers with caps and antennas.
    for (tx, tz) in TOWER_SPOTS {
        let width = 0.5 + rng.gen::<f32>() * 0.8;
        let depth = 0.4 + rng.gen::<f32>() * 0.6;
        let h = 1.0 + rng.gen::<f32>() * 2.0;
        scene.merge(cuboid(vec3(tx, FLOOR_Y + h, tz), vec3(width, h, depth)));
        let cap = h * (0.15 + rng.gen::<f32>() * 0.15);
        scene.merge(cuboid(
            vec3(tx, FLOOR_Y + h * 2.0 + cap, tz),
            vec3(width * 0.7, cap, depth * 0.7),
        ));
        let antenna = 0.3 + rng.gen::<f32>() * 0.5;
        scene.merge(cylinder(
            vec3(tx, FLOOR_Y + h * 2.0 + cap * 2.0, tz),
            0.06,
            antenna,
            6,
        ));
    }

    // Curved pipes spiralling outwards.
    for _ in 0..8 {
        let angle_start = rng.gen_range(0.0f32..TAU);
        let r_start = 3.5 + rng.gen::<f32>() * 2.0;
        let r_end = 8.0 + rng.gen::<f32>() * 4.0;
        let y_start = FLOOR_Y + 1.0 + rng.gen::<f32>() * 3.0;
        let y_end = FLOOR_Y + 0.5 + rng.gen::<f32>() * 4.0;
        let radius = 0.08 + rng.gen::<f32>() * 0.12;

        const SEGMENTS: u32 = 6;
        let points: Vec<Vec3> = (0..=SEGMENTS)
            .map(|s| {
                let t = s as f32 / SEGMENTS as f32;
                let sweep = 0.8 + rng.gen::<f32>() * 1.2;
                let turn = if rng.gen::<bool>() { 1.0 } else { -1.0 };
                let a = angle_start + t * sweep * turn;
                let r = r_start + (r_end - r_start) * t;
                let y = y_start + (y_end - y_start) * t + (t * PI).sin() * 1.5;
                vec3(a.cos() * r, y, a.sin() * r)
            })
            .collect();
        for w in points.windows(2) {
            if let Some(p) = pipe(w[0], w[1], radius, 6) {
                scene.merge(p);
            }
        }
    }

    // Straight pipes crossing the whole floor.
    for i in 0..6 {
        let y = FLOOR_Y + 1.5 + i as f32 * 0.8;
        let z = -8.0 + rng.gen_range(-2.0f32..2.0) + i as f32 * 2.5;
        let sag = rng.gen_range(-0.5f32..0.5);
        if let Some(p) = pipe(vec3(-12.0, y, z), vec3(12.0, y + sag, z), 0.1, 6) {
            scene.merge(p);
        }
    }

    // Domes on stalks, pushed out of the central block.
    for _ in 0..20 {
        let mut x = rng.gen_range(-11.0f32..11.0);
        let z = rng.gen_range(-11.0f32..11.0);
        if x.abs() < 3.5 && z.abs() < 3.0 {
            x += if x > 0.0 { 5.0 } else { -5.0 };
        }
        let r = 0.3 + rng.gen::<f32>() * 0.5;
        let y = FLOOR_Y + r + rng.gen::<f32>() * 1.5;
        scene.merge(sphere(vec3(x, y, z), r, 5, 8));
        scene.merge(cylinder(vec3(x, FLOOR_Y, z), r * 0.5, y - FLOOR_Y - r * 0.3, 6));
    }

    // Concentric ring walls with a gap every quarter turn.
    const RING_SEGMENTS: u32 = 36;
    for (radius, height, thickness) in RING_WALLS {
        for i in (0..RING_SEGMENTS).filter(|i| i % 9 != 0) {
            let a0 = TAU * i as f32 / RING_SEGMENTS as f32;
            let a1 = TAU * (i + 1) as f32 / RING_SEGMENTS as f32;
            scene.merge(ring_wall_block(radius, height, thickness, a0, a1));
        }
    }

    // Lamp posts outside the central block.
    for _ in 0..40 {
        let x = rng.gen_range(-12.0f32..12.0);
        let z = rng.gen_range(-12.0f32..12.0);
        if x.abs() < 4.0 && z.abs() < 3.5 {
            continue;
        }
        let h = 0.8 + rng.gen::<f32>() * 2.5;
        let r = 0.04 + rng.gen::<f32>() * 0.06;
        scene.merge(cylinder(vec3(x, FLOOR_Y, z), r, h, 6));
        let bulb = 0.08 + rng.gen::<f32>() * 0.06;
        scene.merge(sphere(vec3(x, FLOOR_Y + h + 0.06, z), bulb, 3, 6));
    }

    // Bridges: a deck plus a post at each end.
    for (x0, z0, x1, z1, h) in BRIDGES {
        let half_z = if z0 != z1 { (z1 - z0).abs() / 2.0 + 0.2 } else { 0.3 };
        scene.merge(cuboid(
            vec3((x0 + x1) / 2.0, FLOOR_Y + h, (z0 + z1) / 2.0),
            vec3((x1 - x0).abs() / 2.0 + 0.2, 0.08, half_z),
        ));
        for (px, pz) in [(x0, z0), (x1, z1)] {
            scene.merge(cuboid(vec3(px, FLOOR_Y + h / 2.0, pz), vec3(0.15, h / 2.0, 0.15)));
        }
    }

    // Floating particles.
    for _ in 0..60 {
        let x = rng.gen_range(-13.0f32..13.0);
        let y = FLOOR_Y + 2.0 + rng.gen::<f32>() * 7.0;
        let z = rng.gen_range(-13.0f32..13.0);
        let size = 0.05 + rng.gen::<f32>() * 0.12;
        scene.merge(tetrahedron(vec3(x, y, z), size));
    }

    // Stepped border walls.
    for step in 0..5 {
        let r = 3.5 + step as f32 * 0.8;
        let h = 0.3 + step as f32 * 0.15;
        let y = FLOOR_Y + h / 2.0;
        scene.merge(cuboid(vec3(0.0, y, -r), vec3(r + 0.2, h / 2.0, 0.15)));
        scene.merge(cuboid(vec3(0.0, y, r), vec3(r + 0.2, h / 2.0, 0.15)));
        scene.merge(cuboid(vec3(-r, y, 0.0), vec3(0.15, h / 2.0, r)));
        scene.merge(cuboid(vec3(r, y, 0.0), vec3(0.15, h / 2.0, r)));
    }

    scene
}

fn grove_terrain_y(x: f32, z: f32) -> f32 {
    FLOOR_Y
        + 0.4 * (x * 0.5).sin() * (z * 0.4).cos()
        + 0.2 * (x * 1.2 + z * 0.8).sin()
        + 0.1 * (x * 0.3 - z * 1.1).cos()
}

/// Uniform draw in `[-span/2, span/2)`.
fn centered<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

pub fn grove<R: Rng + ?Sized>(rng: &mut R) -> Shape {
    let mut scene = height_field(
        Vec2::splat(-15.0),
        Vec2::splat(15.0),
        (30, 30),
        grove_terrain_y,
    );

    // Trees.
    for _ in 0..22 {
        let x = centered(rng, 26.0);
        let z = centered(rng, 26.0);
        let y = grove_terrain_y(x, z);
        let trunk_h = 1.5 + rng.gen::<f32>() * 3.0;
        let trunk_r = 0.08 + rng.gen::<f32>() * 0.12;
        let canopy_r = 0.6 + rng.gen::<f32>() * 1.6;
        scene.merge(cylinder(vec3(x, y, z), trunk_r, trunk_h, 6));
        scene.merge(sphere(
            vec3(x, y + trunk_h + canopy_r * 0.35, z),
            canopy_r,
            5,
            8,
        ));
    }

    // Rocks, half sunk into the ground.
    for _ in 0..18 {
        let x = centered(rng, 24.0);
        let z = centered(rng, 24.0);
        let y = grove_terrain_y(x, z);
        let size = 0.2 + rng.gen::<f32>() * 0.7;
        scene.merge(sphere(vec3(x, y + size * 0.4, z), size, 3, 5));
    }

    // Grass blades tapering to the tip.
    for _ in 0..400 {
        let x = centered(rng, 28.0);
        let z = centered(rng, 28.0);
        let y = grove_terrain_y(x, z);
        let h = 0.15 + rng.gen::<f32>() * 0.55;
        let w = 0.03 + rng.gen::<f32>() * 0.03;
        let ang = rng.gen::<f32>() * PI;
        let d = vec3(ang.cos() * w, 0.0, ang.sin() * w);
        let root = vec3(x, y, z);
        let tip = root + Vec3::Y * h;
        scene.merge(quad([root - d, root + d, tip + d * 0.3, tip - d * 0.3]));
    }

    // Floating particles.
    for _ in 0..60 {
        let x = centered(rng, 22.0);
        let y = FLOOR_Y + 1.0 + rng.gen::<f32>() * 7.0;
        let z = centered(rng, 22.0);
        let size = 0.04 + rng.gen::<f32>() * 0.1;
        scene.merge(tetrahedron(vec3(x, y, z), size));
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::write_obj;
    use pointscape::{geometry::extract_edges, Mesh};
    use rand::{rngs::StdRng, SeedableRng};

    fn to_mesh(shape: &Shape) -> Mesh {
        let mut buf = Vec::new();
        write_obj(&mut buf, shape, "test").unwrap();
        Mesh::parse(std::str::from_utf8(&buf).unwrap())
    }

    #[test]
    fn logo_layout() {
        let logo = logo();
        assert_eq!(logo.vertices.len(), 24);
        assert_eq!(logo.faces.len(), 26);
        assert!(logo.is_well_formed());
        assert_eq!(logo.faces[24].as_slice(), &[12, 13, 14, 15, 16, 17]);
        assert_eq!(logo.faces[25].as_slice(), &[18, 19, 20, 21, 22, 23]);

        // First outer-top vertex sits at -30°.
        let a = -PI / 6.0;
        assert!((logo.vertices[0] - vec3(a.cos(), 0.35, a.sin())).length() < 1e-6);
    }

    #[test]
    fn logo_caps_fan_triangulate() {
        let mesh = to_mesh(&logo());
        // 24 quads -> 48 triangles, two hexagons -> 4 each
        assert_eq!(mesh.faces.len(), 48 + 8);
        assert_eq!(mesh.faces[48], [12, 13, 14]);
        assert_eq!(mesh.faces[51], [12, 16, 17]);
        assert!(extract_edges(&mesh).edge_count() > 0);
    }

    #[test]
    fn environments_are_well_formed_and_reproducible() {
        for kind in [SceneKind::Metropolis, SceneKind::Grove] {
            let a = kind.build(&mut StdRng::seed_from_u64(42));
            let b = kind.build(&mut StdRng::seed_from_u64(42));
            assert!(a.is_well_formed(), "{kind:?}");
            assert_eq!(a, b, "{kind:?}");
            assert!(a.vertices.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn environments_start_at_the_floor() {
        for kind in [SceneKind::Metropolis, SceneKind::Grove] {
            let mesh = to_mesh(&kind.build(&mut StdRng::seed_from_u64(7)));
            let (lo, hi) = mesh.y_extent().unwrap();
            assert!((-5.0..-2.5).contains(&lo), "{kind:?} min y {lo}");
            assert!(hi > 2.0, "{kind:?} max y {hi}");
            assert!(mesh.surface_area() > 100.0);
        }
    }

    #[test]
    fn grove_contents() {
        let grove = grove(&mut StdRng::seed_from_u64(1));
        let terrain = 31 * 31;
        let trees = 22 * (12 + 4 * 8 + 2);
        let rocks = 18 * (2 * 5 + 2);
        let grass = 400 * 4;
        let particles = 60 * 4;
        assert_eq!(grove.vertices.len(), terrain + trees + rocks + grass + particles);
    }

    #[test]
    fn ring_walls_leave_gaps() {
        let block = ring_wall_block(4.5, 1.2, 0.15, 0.0, 0.1);
        assert_eq!(block.vertices.len(), 8);
        assert!(block.is_well_formed());
        let blocks_per_ring = (0..36).filter(|i| i % 9 != 0).count();
        assert_eq!(blocks_per_ring, 32);
    }
}
