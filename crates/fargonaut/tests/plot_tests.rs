//! Integration tests for plot preparation and rendering.

use std::f64::consts::PI;

use fargonaut::{Axis, FargoError, Output, Plane, PlotOptions, Selection, View};
use test_utils::{assert_approx_eq, create_test_field, test_value, RunDirBuilder};

fn open_run(builder: RunDirBuilder) -> (test_utils::RunDir, Output) {
    let run = builder.build();
    let output = Output::open(run.path()).unwrap();
    (run, output)
}

// ============================================================================
// 2D plot data
// ============================================================================

#[test]
fn test_cylindrical_xy_cartesian_view() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 1)
            .cylindrical()
            .snapshot("gasdens0", create_test_field(4, 3, 1)),
    );
    let field = output.get_field("gasdens", 0).unwrap();

    let data = field.plot_data_2d(View::Cartesian, Plane::XY, 0).unwrap();
    assert_eq!(data.x.dim(), (5, 4));
    assert_eq!(data.y.dim(), (5, 4));
    assert_eq!(data.c.dim(), (4, 3));

    let phi = output.xdomain();
    let r = output.ydomain();
    for i in 0..5 {
        for j in 0..4 {
            assert_approx_eq!(data.x[[i, j]], r[j] * phi[i].cos(), 1e-12);
            assert_approx_eq!(data.y[[i, j]], r[j] * phi[i].sin(), 1e-12);
        }
    }
    assert_eq!(data.c[[2, 1]], test_value(2, 1, 0));
    assert_eq!(data.labels.x, "x");
    assert_eq!(data.labels.y, "y");
    assert_eq!(data.labels.c.as_deref(), Some("Σ_g"));
}

#[test]
fn test_cylindrical_xz_fixes_radius() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 2)
            .cylindrical()
            .snapshot("gasvz0", create_test_field(4, 3, 2)),
    );
    let field = output.get_field("gasvz", 0).unwrap();

    let data = field.plot_data_2d(View::Cartesian, Plane::XZ, 1).unwrap();
    assert_eq!(data.c.dim(), (4, 2));
    assert_eq!(data.c[[3, 1]], test_value(3, 1, 1));

    let r = output.ydomain()[1];
    let phi = output.xdomain();
    let z = output.zdomain();
    assert_approx_eq!(data.x[[2, 0]], r * phi[2].cos(), 1e-12);
    assert_approx_eq!(data.y[[2, 1]], z[1], 1e-12);
    assert_eq!(data.labels.c.as_deref(), Some("v_z"));
}

#[test]
fn test_cylindrical_yz_fixes_azimuth() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 2)
            .cylindrical()
            .snapshot("gasdens0", create_test_field(4, 3, 2)),
    );
    let field = output.get_field("gasdens", 0).unwrap();

    let data = field.plot_data_2d(View::Cartesian, Plane::YZ, 2).unwrap();
    assert_eq!(data.c.dim(), (3, 2));
    assert_eq!(data.c[[1, 1]], test_value(2, 1, 1));

    let phi = output.xdomain()[2];
    let r = output.ydomain();
    assert_approx_eq!(data.x[[3, 0]], r[3] * phi.sin(), 1e-12);
    assert_eq!(data.labels.x, "y");
    assert_eq!(data.labels.y, "z");
}

#[test]
fn test_spherical_projections() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 2)
            .spherical()
            .snapshot("gasdens0", create_test_field(4, 3, 2)),
    );
    let field = output.get_field("gasdens", 0).unwrap();
    let phi = output.xdomain();
    let r = output.ydomain();
    let theta = output.zdomain();

    let xy = field.plot_data_2d(View::Cartesian, Plane::XY, 1).unwrap();
    assert_approx_eq!(xy.x[[1, 2]], r[2] * phi[1].cos() * theta[1].sin(), 1e-12);
    assert_approx_eq!(xy.y[[1, 2]], r[2] * phi[1].sin() * theta[1].sin(), 1e-12);

    let xz = field.plot_data_2d(View::Cartesian, Plane::XZ, 0).unwrap();
    assert_approx_eq!(xz.x[[3, 1]], r[0] * phi[3].cos() * theta[1].sin(), 1e-12);
    assert_approx_eq!(xz.y[[3, 1]], r[0] * theta[1].cos(), 1e-12);

    let yz = field.plot_data_2d(View::Cartesian, Plane::YZ, 3).unwrap();
    assert_approx_eq!(yz.x[[2, 2]], r[2] * phi[3].sin() * theta[2].sin(), 1e-12);
    assert_approx_eq!(yz.y[[2, 2]], r[2] * theta[2].cos(), 1e-12);

    let polar = field.plot_data_2d(View::Polar, Plane::YZ, 0).unwrap();
    assert_eq!(polar.labels.x, "r");
    assert_eq!(polar.labels.y, "θ");
    assert_eq!(polar.x[[1, 0]], r[1]);
    assert_eq!(polar.y[[0, 2]], theta[2]);
}

#[test]
fn test_cartesian_grid_views() {
    let (_run, output) =
        open_run(RunDirBuilder::new(2, 2, 1).snapshot("gasdens0", create_test_field(2, 2, 1)));
    let field = output.get_field("gasdens", 0).unwrap();

    let err = field.plot_data_2d(View::Polar, Plane::XY, 0).unwrap_err();
    assert!(matches!(err, FargoError::UnsupportedView(_)));

    let data = field.plot_data_2d(View::Cartesian, Plane::XY, 0).unwrap();
    assert_eq!(data.x[[2, 0]], output.xdomain()[2]);
    assert_eq!(data.y[[0, 1]], output.ydomain()[1]);
}

// ============================================================================
// 1D plot data
// ============================================================================

#[test]
fn test_line_along_azimuth() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 1)
            .cylindrical()
            .snapshot("gasdens0", create_test_field(4, 3, 1)),
    );
    let field = output.get_field("gasdens", 0).unwrap();

    let polar = field.plot_data_1d(View::Polar, Axis::X, (2, 0)).unwrap();
    assert_eq!(polar.x, field.x().to_vec());
    assert_eq!(polar.y, (0..4).map(|i| test_value(i, 2, 0)).collect::<Vec<_>>());
    assert_eq!(polar.labels.x, "φ");
    assert_eq!(polar.labels.y, "Σ_g");
    assert_eq!(polar.labels.c, None);

    let cart = field.plot_data_1d(View::Cartesian, Axis::X, (2, 0)).unwrap();
    let r = field.y()[2];
    for (x, phi) in cart.x.iter().zip(field.x()) {
        assert_approx_eq!(*x, r * phi.cos(), 1e-12);
    }
}

#[test]
fn test_line_along_radius_and_z() {
    let (_run, output) = open_run(
        RunDirBuilder::new(4, 3, 2)
            .spherical()
            .snapshot("gasvy0", create_test_field(4, 3, 2)),
    );
    let field = output.get_field("gasvy", 0).unwrap();

    let line = field.plot_data_1d(View::Cartesian, Axis::Y, (1, 1)).unwrap();
    let (phi, theta) = (field.x()[1], field.z()[1]);
    for (x, r) in line.x.iter().zip(field.y()) {
        assert_approx_eq!(*x, r * phi.sin() * theta.sin(), 1e-12);
    }
    assert_eq!(line.y, (0..3).map(|j| test_value(1, j, 1)).collect::<Vec<_>>());
    assert_eq!(line.labels.y, "v_r");

    let line = field.plot_data_1d(View::Cartesian, Axis::Z, (0, 2)).unwrap();
    let r = field.y()[2];
    for (x, theta) in line.x.iter().zip(field.z()) {
        assert_approx_eq!(*x, r * theta.cos(), 1e-12);
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_plot_writes_png() {
    let (run, output) = open_run(
        RunDirBuilder::new(8, 4, 1)
            .cylindrical()
            .snapshot("gasdens5", create_test_field(8, 4, 1)),
    );
    let field = output.get_field("gasdens", 5).unwrap();
    let path = run.path().join("gasdens5.png");

    let options = PlotOptions {
        view: Some(View::Cartesian),
        width: 120,
        height: 80,
        clabel: Some("density".into()),
        output: Some(path.clone()),
        ..Default::default()
    };
    let figure = field
        .plot(Selection::Plane { plane: Plane::XY, index: 0 }, &options)
        .unwrap();

    assert_eq!((figure.image.width, figure.image.height), (120, 80));
    assert_eq!(figure.labels.c.as_deref(), Some("density"));
    assert_eq!(figure.labels.x, "x");

    let png = std::fs::read(&path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
    assert_eq!(png, figure.to_png().unwrap());
}

#[test]
fn test_plot_line_and_errors() {
    let (_run, output) = open_run(
        RunDirBuilder::new(8, 4, 1)
            .cylindrical()
            .range(0, 0.0, 2.0 * PI)
            .snapshot("gasdens5", create_test_field(8, 4, 1)),
    );
    let field = output.get_field("gasdens", 5).unwrap();

    let figure = field
        .plot(Selection::Line { axis: Axis::Y, index: (0, 0) }, &PlotOptions::default())
        .unwrap();
    assert_eq!(figure.labels.x, "r");
    assert_eq!(figure.labels.c, None);

    let err = field
        .plot(Selection::Plane { plane: Plane::XZ, index: 4 }, &PlotOptions::default())
        .unwrap_err();
    assert!(matches!(err, FargoError::InvalidArgument(_)));
}

#[test]
fn test_default_options_follow_coordinate_system() {
    let (_run, output) =
        open_run(RunDirBuilder::new(4, 3, 1).snapshot("gasdens0", create_test_field(4, 3, 1)));
    let field = output.get_field("gasdens", 0).unwrap();

    let figure = field
        .plot(Selection::Plane { plane: Plane::XY, index: 0 }, &PlotOptions::default())
        .unwrap();
    assert_eq!(figure.labels.x, "x");
    assert_eq!(figure.labels.y, "y");

    let figure = field
        .plot(Selection::Line { axis: Axis::Y, index: (1, 0) }, &PlotOptions::default())
        .unwrap();
    assert_eq!(figure.labels.x, "y");

    let options: PlotOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options.view, None);
}

#[test]
fn test_plot_options_from_json() {
    let options: PlotOptions =
        serde_json::from_str(r#"{"view": "cartesian", "colormap": "inferno", "width": 200}"#).unwrap();
    assert_eq!(options.view, Some(View::Cartesian));
    assert_eq!(options.width, 200);
    assert_eq!(options.height, 480);

    let selection: Selection =
        serde_json::from_str(r#"{"plane": {"plane": "xz", "index": 3}}"#).unwrap();
    assert_eq!(selection, Selection::Plane { plane: Plane::XZ, index: 3 });
}
