use foilcad_core::prelude::*;

#[test]
fn parse_then_translate() {
    let profile = parse_dat("0.000000 0.000000\n1.000000 0.500000\n").unwrap();
    assert_eq!(
        profile.points(),
        &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.5)]
    );

    let settings = TransformSettings {
        translate: Some(Translation { dx: 1000.0, dy: 0.0 }),
        ..Default::default()
    };
    let moved = settings.apply(&profile).unwrap();

    let expected = [(1.0, 0.0), (2.0, 0.5)];
    for (p, (x, y)) in moved.points().iter().zip(expected) {
        assert!((p.x - x).abs() < 1e-12);
        assert!((p.y - y).abs() < 1e-12);
    }
    // 原轮廓保持不变
    assert_eq!(profile.points()[1], Point2::new(1.0, 0.5));
}

#[test]
fn lednicer_file_scaled_to_chord() {
    let text = "\
GOE 123 AIRFOIL
       4.       4.

 0.000000  0.000000
 0.300000  0.090000
 0.700000  0.050000
 1.000000  0.000000

 0.000000  0.000000
 0.300000 -0.010000
 0.700000 -0.005000
 1.000000  0.000000
";
    let profile = parse_dat(text).unwrap();
    assert_eq!(profile.len(), 7);
    assert_eq!(profile.name(), Some("GOE 123 AIRFOIL"));
    assert!(profile.is_closed(1e-12));

    let settings = TransformSettings {
        scale: ScaleSettings {
            width: Some(300.0),
            y_factor: Some(1.5),
        },
        mirror: Mirror::Horizontal,
        ..Default::default()
    };
    let out = settings.apply(&profile).unwrap();
    assert!((out.extent_x() - 0.3).abs() < 1e-12);
    // 水平镜像后前缘在原点，后缘在 -0.3
    assert!((out.bounding_box().min.x + 0.3).abs() < 1e-12);
    assert_eq!(out.to_flat_buffer().len(), 14);
}
