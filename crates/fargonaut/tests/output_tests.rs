//! Integration tests for opening run directories.

use fargonaut::{
    Axis, ByteOrder, CoordinateSystem, FargoError, OptionValue, Output, Precision, Quantity,
    ReaderConfig,
};
use test_utils::{assert_slice_approx_eq, create_test_field, fixtures::text, uniform_edges, RunDirBuilder};

// ============================================================================
// Metadata parsing
// ============================================================================

#[test]
fn test_open_reads_variables_and_options() {
    let run = RunDirBuilder::new(5, 3, 3).cylindrical().build();
    run.write_file("variables.par", text::VARIABLES.as_bytes());
    run.write_file("summary0.dat", text::SUMMARY_CYLINDRICAL.as_bytes());

    let output = Output::open(run.path()).unwrap();

    assert_eq!(output.directory(), run.path());
    assert_eq!(output.get_var("VAR1").unwrap(), "VAL1");
    assert_eq!(output.get_var("VARN").unwrap(), "VALN");
    let keys: Vec<_> = output.vars().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["VAR1", "VAR2", "NX", "NY", "NZ", "VARN"]);

    let opts: Vec<_> = output.opts().keys().map(String::as_str).collect();
    assert_eq!(opts, vec!["X", "Y", "ISOTHERMAL", "CYLINDRICAL"]);
    assert_eq!(output.get_opt("ISOTHERMAL").unwrap(), &OptionValue::Flag);
    assert!(output.has_opt("ISOTHERMAL"));
    assert!(!output.has_opt("PARALLEL"));
    assert_eq!(output.coordinate_system(), CoordinateSystem::Cylindrical);
}

#[test]
fn test_lookups_are_stable_and_fail_for_unknown_keys() {
    let run = RunDirBuilder::new(4, 2, 1).variable("ASPECTRATIO", "0.05").build();
    let output = Output::open(run.path()).unwrap();

    assert_eq!(output.get_var("ASPECTRATIO").unwrap(), output.get_var("ASPECTRATIO").unwrap());
    assert_eq!(output.get_var_as::<f64>("ASPECTRATIO").unwrap(), 0.05);
    assert_eq!(output.get_var_as::<usize>("NX").unwrap(), 4);

    let err = output.get_var("NOPE").unwrap_err();
    assert!(matches!(err, FargoError::VariableNotFound(_)));
    assert!(err.is_not_found());

    let err = output.get_opt("PARALLEL").unwrap_err();
    assert!(matches!(err, FargoError::OptionNotFound(_)));

    let err = output.get_var_as::<usize>("ASPECTRATIO").unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

#[test]
fn test_valued_options() {
    let run = RunDirBuilder::new(2, 2, 1).option("NGHY=3").build();
    let output = Output::open(run.path()).unwrap();
    assert_eq!(output.get_opt("NGHY").unwrap().as_str(), Some("3"));
}

// ============================================================================
// Domains and ghost cells
// ============================================================================

#[test]
fn test_domains_without_ghosts() {
    let run = RunDirBuilder::new(4, 2, 1).build();
    let output = Output::open(run.path()).unwrap();

    assert_eq!((output.nx(), output.ny(), output.nz()), (4, 2, 1));
    assert_eq!((output.nghx(), output.nghy(), output.nghz()), (0, 0, 0));
    assert!(!output.includes_ghosts());
    assert_eq!(output.domain_x(), output.xdomain());
    assert_slice_approx_eq!(output.xdomain(), &[-1.0, -0.5, 0.0, 0.5, 1.0], 1e-12);
}

#[test]
fn test_domains_with_ghosts_are_trimmed() {
    let run = RunDirBuilder::new(8, 4, 1).cylindrical().ghosts(0, 3, 0).build();
    let output = Output::open(run.path()).unwrap();

    assert_eq!(output.nghy(), 3);
    assert!(output.includes_ghosts());
    assert_eq!(output.domain_y().len(), 4 + 1 + 6);
    assert_eq!(output.ydomain().len(), 5);
    assert_slice_approx_eq!(output.ydomain(), &uniform_edges(0.4, 2.5, 4, 0), 1e-12);
}

#[test]
fn test_inconsistent_domain_is_malformed() {
    let run = RunDirBuilder::new(4, 2, 1).build();
    // five cells' worth of edges for four cells: one stray edge
    run.write_file("domain_x.dat", b"0\n1\n2\n3\n4\n5\n");
    let err = Output::open(run.path()).unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

#[test]
fn test_non_numeric_domain_is_malformed() {
    let run = RunDirBuilder::new(2, 1, 1).build();
    run.write_file("domain_z.dat", b"0.0\nabc\n");
    let err = Output::open(run.path()).unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_missing_metadata_files() {
    for name in ["variables.par", "summary0.dat", "domain_y.dat"] {
        let run = RunDirBuilder::new(2, 2, 1).build();
        run.remove_file(name);
        let err = Output::open(run.path()).unwrap_err();
        assert!(err.is_not_found(), "{}: {}", name, err);
    }
}

#[test]
fn test_undecodable_metadata_lines_are_skipped() {
    let run = RunDirBuilder::new(2, 2, 1).cylindrical().build();
    run.write_file("variables.par", b"NX\t2\nNY\t2\nNZ\t1\nTITLE\t\xff\xfe\n");
    let mut summary = b"COMPILATION OPTION SECTION:\n==\n-DX -DY -DCYLINDRICAL -D\xff\n".to_vec();
    summary.extend_from_slice(b"junk \xc3\x28 line\n");
    run.write_file("summary0.dat", &summary);

    let output = Output::open(run.path()).unwrap();
    assert_eq!((output.nx(), output.ny(), output.nz()), (2, 2, 1));
    assert_eq!(output.coordinate_system(), CoordinateSystem::Cylindrical);
    assert!(output.has_opt("X"));
}

#[test]
fn test_undecodable_grid_size_is_malformed() {
    let run = RunDirBuilder::new(2, 2, 1).build();
    run.write_file("variables.par", b"NX\t2\nNY\t\xff\nNZ\t1\n");
    let err = Output::open(run.path()).unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

#[test]
fn test_missing_grid_size_is_malformed() {
    let run = RunDirBuilder::new(2, 2, 1).build();
    run.write_file("variables.par", b"NX\t2\nNY\t2\n");
    let err = Output::open(run.path()).unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

#[test]
fn test_conflicting_coordinate_systems() {
    let run = RunDirBuilder::new(2, 2, 1).cylindrical().option("SPHERICAL").build();
    let err = Output::open(run.path()).unwrap_err();
    assert!(matches!(err, FargoError::MalformedMetadata(_)));
}

#[test]
fn test_missing_coordinate_system_defaults_to_cartesian() {
    let run = RunDirBuilder::new(2, 2, 1).no_coordinate_system().build();
    let output = Output::open(run.path()).unwrap();
    assert_eq!(output.coordinate_system(), CoordinateSystem::Cartesian);
}

#[test]
fn test_get_field_errors() {
    let run = RunDirBuilder::new(2, 2, 1)
        .snapshot("gasdens0", create_test_field(2, 2, 1))
        .build();
    let output = Output::open(run.path()).unwrap();

    let err = output.get_field("nonexistent_quantity", 0).unwrap_err();
    assert!(matches!(err, FargoError::UnsupportedQuantity(_)));

    let err = output.get_field("gasvphi", 25).unwrap_err();
    assert!(matches!(err, FargoError::UnsupportedQuantity(_)));

    let err = output.get_field("gasdens", 7).unwrap_err();
    assert!(matches!(err, FargoError::NotFound { .. }));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_file_names() {
    let run = RunDirBuilder::new(2, 2, 1).build();
    let vars = std::fs::read(run.path().join("variables.par")).unwrap();
    run.write_file("params.txt", &vars);
    run.remove_file("variables.par");

    let config = ReaderConfig {
        variables_file: "params.txt".into(),
        ..Default::default()
    };
    let output = Output::open_with_config(run.path(), &config).unwrap();
    assert_eq!(output.nx(), 2);
}

#[test]
fn test_precision_follows_float_option() {
    let run = RunDirBuilder::new(2, 1, 1)
        .option("FLOAT")
        .snapshot("gasdens0", vec![0.5, 1.5])
        .build();
    let output = Output::open(run.path()).unwrap();
    assert_eq!(output.precision(), Precision::Single);
    assert_eq!(output.get_field("gasdens", 0).unwrap().raw(), &[0.5, 1.5]);

    // Forcing double precision makes the 8-byte file one value long
    let config = ReaderConfig {
        precision: Some(Precision::Double),
        byte_order: ByteOrder::Native,
        ..Default::default()
    };
    let output = Output::open_with_config(run.path(), &config).unwrap();
    let err = output.get_field("gasdens", 0).unwrap_err();
    assert!(matches!(err, FargoError::ShapeMismatch { expected: 2, actual: 1, .. }));
}

#[test]
fn test_invalid_config_rejected() {
    let run = RunDirBuilder::new(1, 1, 1).build();
    let config = ReaderConfig {
        summary_file: String::new(),
        ..Default::default()
    };
    let err = Output::open_with_config(run.path(), &config).unwrap_err();
    assert!(matches!(err, FargoError::Config(_)));
}

// ============================================================================
// Snapshot discovery
// ============================================================================

#[test]
fn test_snapshot_discovery_and_summary() {
    let raw = create_test_field(2, 2, 1);
    let run = RunDirBuilder::new(2, 2, 1)
        .cylindrical()
        .snapshot("gasdens10", raw.clone())
        .snapshot("gasdens2", raw.clone())
        .snapshot("gasvy2", raw.clone())
        .snapshot("by0", raw)
        .build();
    let output = Output::open(run.path()).unwrap();

    assert_eq!(output.snapshots(Quantity::Density).unwrap(), vec![2, 10]);
    assert!(output.snapshots(Quantity::Energy).unwrap().is_empty());
    assert_eq!(
        output.available_quantities().unwrap(),
        vec![
            Quantity::Density,
            Quantity::Velocity(Axis::Y),
            Quantity::MagneticField(Axis::Y)
        ]
    );

    let summary = output.summary().unwrap();
    assert_eq!(summary.grid.shape, [2, 2, 1]);
    assert_eq!(summary.snapshots["gasdens"], vec![2, 10]);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["grid"]["coordinate_system"], "cylindrical");
    assert_eq!(json["precision"], "double");
    assert_eq!(json["snapshots"]["gasvy"][0], 2);
    assert_eq!(json["variables"]["NX"], "2");
}

#[test]
fn test_zero_padded_snapshot_files_not_listed() {
    let raw = create_test_field(2, 2, 1);
    let run = RunDirBuilder::new(2, 2, 1)
        .snapshot("gasdens007", raw.clone())
        .snapshot("gasdens3", raw)
        .build();
    let output = Output::open(run.path()).unwrap();

    let nums = output.snapshots(Quantity::Density).unwrap();
    assert_eq!(nums, vec![3]);
    for num in nums {
        assert!(output.get_field("gasdens", num).is_ok());
    }
}
