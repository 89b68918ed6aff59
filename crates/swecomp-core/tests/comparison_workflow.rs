use std::fs;
use std::path::Path;
use swecomp_core::common::{CompareSettings, RunFolderSettings};
use swecomp_core::modules::collection::walk_collection;
use swecomp_core::modules::frame::{build_frames, write_frame_reports};
use swecomp_core::modules::plan::{build_plan, scan_run_folders};
use tempfile::TempDir;

fn write_result(root: &Path, name: &str, coords: &str, h: &str) {
    fs::create_dir_all(root).expect("run folder should be created");
    let body = format!(
        "<VTKFile type=\"RectilinearGrid\"><RectilinearGrid><Piece>\
         <Coordinates><DataArray type=\"Float64\">{}</DataArray></Coordinates>\
         <CellData><DataArray type=\"Float64\" Name=\"h\">{}</DataArray>\
         <DataArray type=\"Float64\" Name=\"hu\">0.0 0.0 0.0</DataArray>\
         <DataArray type=\"Float64\" Name=\"b\">0.0 0.0 0.0</DataArray>\
         </CellData></Piece></RectilinearGrid></VTKFile>",
        coords, h
    );
    fs::write(root.join(name), body).expect("result file should be written");
}

fn write_log(root: &Path, lines: &str) {
    fs::write(root.join("timing_log.txt"), lines).expect("log file should be written");
}

/// Three configured folders: one complete, one partial with a failed run,
/// one missing entirely. The comparison must degrade gracefully instead of
/// aborting.
#[test]
fn partial_and_missing_folders_degrade_gracefully() {
    let temp = TempDir::new().expect("tempdir should be created");
    let aug = temp.path().join("aug_out");
    let hllc = temp.path().join("hllc_out");

    for (index, h) in [(0, "4.0 4.0 4.0"), (1, "4.0 4.0 3.0"), (2, "4.0 3.0 3.0"), (3, "3.0 3.0 3.0")] {
        write_result(&aug, &format!("dam_{}.vtr", index), "0.0 0.5 1.0 1.5", h);
    }
    write_result(&hllc, "dam_0.vtr", "0.0 0.5 1.0 1.5", "4.0 4.0 4.0");
    write_result(&hllc, "dam_2.vtr", "0.0 0.5 1.0 1.5", "4.0 4.0 2.0");
    write_log(&aug, "dam, duration=1.25s\n");
    write_log(&hllc, "dam, ERROR: CFL violation\n");

    let settings = CompareSettings::new(vec![
        RunFolderSettings::new("aug", &aug),
        RunFolderSettings::new("hllc", &hllc),
        RunFolderSettings::new("ghost", temp.path().join("ghost_out")),
    ]);

    let active = scan_run_folders(&settings).expect("scan should succeed");
    assert_eq!(active.runs.len(), 2, "missing folder should be dropped");

    let plan = build_plan(&active);
    assert_eq!(plan.get("dam"), Some(&vec![1, 2, 3]));

    let logs = active.load_logs();
    let frames = build_frames(&active, &plan, &logs);
    assert_eq!(frames.len(), 3);

    // Index 2 is the only frame both surviving runs contribute to.
    let shared = frames.iter().find(|frame| frame.index == 2).expect("frame i=2");
    assert_eq!(shared.runs.len(), 2);
    let solo = frames.iter().find(|frame| frame.index == 3).expect("frame i=3");
    assert_eq!(solo.runs.len(), 1);
    assert_eq!(solo.runs[0].run, "aug");

    // Baseline comes from the first configured run with a finite index-0 total.
    assert_eq!(shared.conservation.baseline_source.as_deref(), Some("aug"));
    assert!((shared.conservation.baseline_total - 12.0).abs() < 1e-12);
    let hllc_entry = &shared.conservation.runs[1];
    assert!((hllc_entry.lost - 2.0).abs() < 1e-12);
    assert!((hllc_entry.lost_percent - 100.0 * 2.0 / 12.0).abs() < 1e-12);

    // Timing block: per-run lines in configured order, then the race.
    assert_eq!(
        shared.status_lines,
        vec!["aug: 1.250s", "hllc: CFL violation", "Fastest: aug"]
    );

    let out_dir = temp.path().join("artifacts");
    write_frame_reports(&frames, &out_dir).expect("reports should be written");
    for index in [1, 2, 3] {
        assert!(out_dir.join(format!("dam_i{}.json", index)).exists());
    }
}

#[test]
fn collection_walk_handles_missing_members() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_result(temp.path(), "surge_0.vtr", "0.0 0.5 1.0 1.5", "2.0 2.0 2.0");
    write_result(temp.path(), "surge_1.vtr", "0.0 0.5 1.0 1.5", "2.0 2.0 1.0");

    let manifest = temp.path().join("surge.pvd");
    fs::write(
        &manifest,
        "<VTKFile type=\"Collection\"><Collection>\
         <DataSet timestep=\"0.0\" file=\"surge_0.vtr\"/>\
         <DataSet timestep=\"0.5\" file=\"surge_1.vtr\"/>\
         <DataSet timestep=\"1.0\" file=\"surge_2.vtr\"/>\
         </Collection></VTKFile>",
    )
    .expect("manifest should be written");

    let report = walk_collection(&manifest).expect("walk should succeed");
    assert_eq!(report.entries.len(), 3);
    assert!((report.baseline_total - 3.0).abs() < 1e-12);

    assert!((report.entries[1].lost - 0.5).abs() < 1e-12);
    assert!((report.entries[1].lost_percent - 100.0 * 0.5 / 3.0).abs() < 1e-12);

    // The missing third member stays in the report as a NaN total.
    assert!(report.entries[2].total.is_nan());
    assert!(report.entries[2].lost.is_nan());
}
