use mount_builder::LogViewer;
use mount_cli::{output_dir, run_pipeline};
use mount_export::stl::read_binary_stl;
use mount_kernel::{MockKernel, TruckKernel};
use mount_types::ParameterSet;

const EXPECTED: [&str; 4] = [
    "JBL_Clip4_Pilot_LeftDoor.stl",
    "JBL_Clip4_Pilot_RightDoor.stl",
    "JBL_Clip4_Pilot_LeftDoor.step",
    "JBL_Clip4_Pilot_RightDoor.step",
];

#[test]
fn mock_pipeline_writes_fixed_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let mut viewer = LogViewer::default();

    let written = run_pipeline(
        &mut kernel,
        &ParameterSet::default(),
        dir.path(),
        Some(&mut viewer),
    )
    .unwrap();

    assert_eq!(written.len(), 4);
    assert_eq!(viewer.shown.len(), 2);
    for name in EXPECTED {
        let meta = std::fs::metadata(dir.path().join(name)).unwrap();
        assert!(meta.len() > 0, "{name} is empty");
    }
}

#[test]
fn viewer_does_not_change_output() {
    let with = tempfile::tempdir().unwrap();
    let without = tempfile::tempdir().unwrap();
    let params = ParameterSet::default();

    let mut viewer = LogViewer::default();
    run_pipeline(&mut MockKernel::new(), &params, with.path(), Some(&mut viewer)).unwrap();
    run_pipeline(&mut MockKernel::new(), &params, without.path(), None).unwrap();

    for name in EXPECTED {
        let a = std::fs::read(with.path().join(name)).unwrap();
        let b = std::fs::read(without.path().join(name)).unwrap();
        assert_eq!(a, b, "{name} differs");
    }
}

#[test]
fn degenerate_pocket_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let params = ParameterSet {
        pocket_depth: 1.0,
        ..ParameterSet::default()
    };
    let err = run_pipeline(&mut MockKernel::new(), &params, dir.path(), None).unwrap_err();
    assert!(format!("{err:#}").contains("cradle construction failed"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn output_dir_is_next_to_test_binary() {
    let dir = output_dir().unwrap();
    let exe = std::env::current_exe().unwrap();
    assert_eq!(exe.parent().unwrap(), dir.as_path());
}

#[test]
fn truck_pipeline_writes_fixed_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = TruckKernel::new();
    run_pipeline(&mut kernel, &ParameterSet::default(), dir.path(), None).unwrap();
    for name in EXPECTED {
        let meta = std::fs::metadata(dir.path().join(name)).unwrap();
        assert!(meta.len() > 84, "{name} is too small");
    }

    let volume = |name: &str| {
        let bytes = std::fs::read(dir.path().join(name)).unwrap();
        read_binary_stl(&bytes).unwrap().signed_volume
    };
    let left = volume(EXPECTED[0]);
    let right = volume(EXPECTED[1]);
    assert!(left > 0.0);
    assert!((left - right).abs() <= 1e-3 * left, "left {left} vs right {right}");
}
