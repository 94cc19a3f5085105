use softraster::colors;
use softraster::math::vec3::Vec3;
use softraster::render::{
    assemble_triangles, FrameBuffer, ScanlineRasterizer, ShadingMode, DEPTH_CLEAR,
};
use softraster::transform::ScreenVertex;
use softraster::{render, render_model, CameraParams, Material, MeshShape, Model, Rgb};

// ============================================================================
// Helpers
// ============================================================================

/// Draws screen-space triangles (x, y in pixels, z as depth) straight into `fb`,
/// skipping projection.
fn draw_screen_triangles(
    fb: &mut FrameBuffer,
    mode: ShadingMode,
    points: &[(f32, f32, f32)],
    diffuse: Rgb,
) {
    let vertices: Vec<ScreenVertex> = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z))| ScreenVertex::new(Vec3::new(x, y, z), i))
        .collect();
    let normals = vec![Vec3::new(0.0, 0.0, -1.0); vertices.len()];
    let indices: Vec<u32> = (0..vertices.len() as u32).collect();

    let rasterizer = ScanlineRasterizer::new(mode);
    let triangles = assemble_triangles(&indices, &vertices, &normals);
    for t in rasterizer.setup(&triangles, fb.width(), fb.height()) {
        rasterizer.fill_triangle(&t, fb, diffuse);
    }
}

fn camera_text() -> &'static str {
    "# left right top bottom near far\n\
     -1, 1, 1, -1, 1, 10\n\
     # eye\n\
     0 0 -3\n\
     # center\n\
     0 0 0\n\
     # up\n\
     0 1 0\n"
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("softraster-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// Screen-space scenarios
// ============================================================================

#[test]
fn right_triangle_fills_exact_footprint() {
    let mut fb = FrameBuffer::new(30, 30);
    draw_screen_triangles(
        &mut fb,
        ShadingMode::White,
        &[(10.0, 10.0, 0.5), (20.0, 10.0, 0.5), (10.0, 20.0, 0.5)],
        colors::BLACK,
    );

    let mut lit = 0;
    for y in 0..30u32 {
        for x in 0..30u32 {
            let inside = (10..=20).contains(&y) && x >= 10 && x + y <= 30;
            if inside {
                lit += 1;
                assert_eq!(fb.color_at(x, y), Some(colors::WHITE), "({x}, {y})");
                let depth = fb.depth_at(x, y).unwrap();
                assert!((depth - 0.5).abs() < 1e-6, "({x}, {y}) depth {depth}");
            } else {
                assert_eq!(fb.color_at(x, y), Some(colors::BLACK), "({x}, {y})");
                assert_eq!(fb.depth_at(x, y), Some(DEPTH_CLEAR));
            }
        }
    }
    // Rows 10..=20 hold 11, 10, ..., 1 pixels.
    assert_eq!(lit, 66);
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let near_color = Rgb::new(0, 255, 0);
    let far_color = Rgb::new(0, 0, 255);
    let near = [(5.0, 5.0, 0.2), (20.0, 5.0, 0.2), (5.0, 20.0, 0.2)];
    let far = [(8.0, 8.0, 0.8), (28.0, 8.0, 0.8), (8.0, 28.0, 0.8)];

    let mut near_first = FrameBuffer::new(30, 30);
    draw_screen_triangles(&mut near_first, ShadingMode::Default, &near, near_color);
    draw_screen_triangles(&mut near_first, ShadingMode::Default, &far, far_color);

    let mut far_first = FrameBuffer::new(30, 30);
    draw_screen_triangles(&mut far_first, ShadingMode::Default, &far, far_color);
    draw_screen_triangles(&mut far_first, ShadingMode::Default, &near, near_color);

    for fb in [&near_first, &far_first] {
        // Overlap.
        assert_eq!(fb.color_at(10, 10), Some(near_color));
        assert!((fb.depth_at(10, 10).unwrap() - 0.2).abs() < 1e-6);
        // Only the far triangle.
        assert_eq!(fb.color_at(20, 15), Some(far_color));
        // Only the near triangle.
        assert_eq!(fb.color_at(6, 6), Some(near_color));
    }
    assert_eq!(near_first.raster(), far_first.raster());
}

#[test]
fn off_screen_and_culled_triangles_leave_frame_untouched() {
    let mut fb = FrameBuffer::new(16, 16);
    draw_screen_triangles(
        &mut fb,
        ShadingMode::White,
        &[
            // Left of the raster.
            (-20.0, 2.0, 0.5),
            (-10.0, 3.0, 0.5),
            (-15.0, 9.0, 0.5),
            // Beyond the far plane.
            (2.0, 2.0, 1.2),
            (12.0, 2.0, 1.5),
            (2.0, 12.0, 1.1),
            // Before the near plane.
            (2.0, 2.0, -0.2),
            (12.0, 2.0, -0.5),
            (2.0, 12.0, -0.1),
        ],
        colors::BLACK,
    );
    assert!(fb.depth_buffer().iter().all(|&d| d == DEPTH_CLEAR));
}

#[test]
fn straddling_triangle_is_drawn_uncut() {
    // One vertex beyond the far plane: kept whole, and depths above 1 still
    // pass the test against the cleared buffer.
    let mut fb = FrameBuffer::new(30, 30);
    draw_screen_triangles(
        &mut fb,
        ShadingMode::White,
        &[(5.0, 5.0, 0.5), (25.0, 5.0, 0.5), (5.0, 25.0, 1.5)],
        colors::BLACK,
    );
    assert_eq!(fb.color_at(5, 24), Some(colors::WHITE));
    assert!(fb.depth_at(5, 24).unwrap() > 1.0);
    assert!(fb.depth_at(6, 6).unwrap() < 1.0);
}

#[test]
fn partially_visible_triangle_is_clipped_to_raster() {
    let mut fb = FrameBuffer::new(20, 20);
    draw_screen_triangles(
        &mut fb,
        ShadingMode::Gouraud,
        &[(-10.0, -10.0, 0.4), (40.0, -10.0, 0.4), (-10.0, 40.0, 0.4)],
        colors::BLACK,
    );
    // The hypotenuse x + y = 30 crosses the raster; everything above-left is covered.
    assert!(fb.depth_at(0, 0).unwrap() < 1.0);
    assert!(fb.depth_at(19, 10).unwrap() < 1.0);
    assert_eq!(fb.depth_at(19, 19), Some(DEPTH_CLEAR));
}

// ============================================================================
// Camera and file-driven scenarios
// ============================================================================

fn facing_square(half: f32, z: f32) -> MeshShape {
    MeshShape::new(
        "square",
        vec![-half, -half, z, half, -half, z, half, half, z, -half, half, z],
        [0.0, 0.0, -1.0].repeat(4),
        vec![0, 1, 2, 0, 2, 3],
        None,
    )
}

#[test]
fn camera_render_centers_square() {
    let camera: CameraParams = camera_text().parse().unwrap();
    let shapes = [facing_square(0.9, 0.0)];
    let raster = render(&shapes, &[], &camera, 30, 30, ShadingMode::White).unwrap();

    // Eye at distance 3 with a unit near plane: the square spans ndc [-0.3, 0.3],
    // pixels [10.5, 19.5].
    assert_eq!(raster.get(15, 15), Some(colors::WHITE));
    assert_eq!(raster.get(12, 17), Some(colors::WHITE));
    for (x, y) in [(0, 0), (29, 0), (0, 29), (29, 29), (8, 15), (15, 22)] {
        assert_eq!(raster.get(x, y), Some(colors::BLACK), "({x}, {y})");
    }
}

#[test]
fn normal_modes_color_a_facing_square_by_its_normal() {
    let camera: CameraParams = camera_text().parse().unwrap();
    // Normal (0, 0, -1) points back at the eye; in camera space it stays (0, 0, -1).
    let expected = Rgb::new(128, 128, 0);
    for mode in [
        ShadingMode::Flat,
        ShadingMode::Gouraud,
        ShadingMode::GouraudZ,
        ShadingMode::Barycentric,
        ShadingMode::BarycentricZ,
    ] {
        let raster = render(&[facing_square(0.9, 0.0)], &[], &camera, 30, 30, mode).unwrap();
        assert_eq!(raster.get(15, 15), Some(expected), "{mode}");
    }
}

#[test]
fn obj_and_camera_files_render_with_material_color() {
    let dir = temp_dir("obj");
    std::fs::write(dir.join("scene.mtl"), "newmtl red\nKd 1.0 0.0 0.0\n").unwrap();
    std::fs::write(
        dir.join("scene.obj"),
        "mtllib scene.mtl\n\
         o square\n\
         v -0.5 -0.5 0\n\
         v 0.5 -0.5 0\n\
         v 0.5 0.5 0\n\
         v -0.5 0.5 0\n\
         vn 0 0 -1\n\
         usemtl red\n\
         f 1//1 2//1 3//1\n\
         f 1//1 3//1 4//1\n",
    )
    .unwrap();
    std::fs::write(dir.join("camera.txt"), camera_text()).unwrap();

    let model = Model::from_obj(dir.join("scene.obj")).unwrap();
    let camera = CameraParams::from_file(dir.join("camera.txt")).unwrap();

    assert_eq!(model.shapes().len(), 1);
    assert_eq!(model.materials(), &[Material::new("red", [1.0, 0.0, 0.0])]);
    assert_eq!(model.shapes()[0].material_id, Some(0));
    assert_eq!(model.shapes()[0].triangle_count(), 2);

    let raster = render_model(&model, &camera, 20, 20, ShadingMode::Default).unwrap();
    assert_eq!(raster.get(10, 10), Some(Rgb::new(255, 0, 0)));
    assert_eq!(raster.get(0, 0), Some(colors::BLACK));

    let output = dir.join("out.ppm");
    raster.save(&output).unwrap();
    assert_eq!(softraster::Raster::open(&output).unwrap(), raster);

    let _ = std::fs::remove_dir_all(&dir);
}
