/// Workspace loading through cargo metadata, using fixtures/ffi_ws.

use std::path::PathBuf;

use em_import::application::ExtractUsecase;
use em_import::infrastructure::project_loader::ProjectLoader;
use em_import::infrastructure::{LegacyMangler, SynDeclParser};
use em_import::ports::descriptor_emitter::SexprEmitter;

fn fixture_manifest() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/ffi_ws/Cargo.toml")
        .to_string_lossy()
        .to_string()
}

#[test]
fn test_workspace_files_collected() {
    let files = ProjectLoader::load_workspace(&fixture_manifest()).unwrap();
    let modules: Vec<&str> = files.iter().map(|f| f.0.as_str()).collect();
    assert_eq!(modules, vec!["canvas_core", "canvas_core::shapes", "host_app"]);
    assert!(files[0].1.ends_with("lib.rs"));
    assert!(files[1].1.ends_with("shapes.rs"));
    assert!(files[2].1.ends_with("main.rs"));
}

#[test]
fn test_workspace_extraction() {
    let files = ProjectLoader::load_workspace(&fixture_manifest()).unwrap();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
    let usecase = ExtractUsecase {
        parser: &SynDeclParser,
        resolver: &LegacyMangler,
        emitter: &SexprEmitter,
        pool: Some(&pool),
    };
    let mut out = Vec::new();
    let report = usecase.run(&files, &mut out).unwrap();

    assert_eq!(report.units, 3);
    assert_eq!(report.descriptors, 6);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            "(func _ZN11canvas_core3logE \"consoleLog\" (\"&str\") \"()\")\n",
            "(constructor \"HTMLCanvas\" _ZN11canvas_core6Canvas3newE (\"u32\" \"u32\") \"Canvas\")\n",
            "(method \"HTMLCanvas\" _ZN11canvas_core6Canvas9fill_rectE \"fillRect\" (\"f64\" \"f64\" \"f64\" \"f64\") \"()\")\n",
            "(func shapes_now \"now\" () \"f64\")\n",
            "(func _ZN11canvas_core6shapes5countE \"shapeCount\" () \"usize\")\n",
            "(func host_random \"hostRandom\" () \"f64\")\n",
        )
    );
}
