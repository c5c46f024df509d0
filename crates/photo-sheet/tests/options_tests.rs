use photo_sheet::*;

#[test]
fn test_default_options_are_valid() {
    let options = StudioOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(options.default_copies, 1);
    assert!(!options.allow_preview_fallback);
}

#[test]
fn test_validation_zoom_range() {
    let mut options = StudioOptions::default();
    options.passport_zoom_min = 2.0;
    match options.validate() {
        Err(SheetError::Config(msg)) => assert!(msg.contains("passport")),
        other => panic!("Expected Config error, got {other:?}"),
    }

    let mut options = StudioOptions::default();
    options.polaroid_zoom_max = 0.5;
    assert!(matches!(options.validate(), Err(SheetError::Config(_))));
}

#[test]
fn test_workflow_rejects_inverted_zoom_range() {
    let mut options = StudioOptions::default();
    options.passport_zoom_min = 2.0;
    options.passport_zoom_max = 1.5;
    match Workflow::new(options) {
        Err(SheetError::Config(msg)) => assert!(msg.contains("passport")),
        other => panic!("Expected Config error, got {other:?}"),
    }
    assert!(Workflow::new(StudioOptions::default()).is_ok());
}

#[test]
fn test_validation_limits() {
    let mut options = StudioOptions::default();
    options.default_enhance_level = 1.2;
    assert!(matches!(options.validate(), Err(SheetError::Config(_))));

    let mut options = StudioOptions::default();
    options.default_copies = 0;
    assert!(matches!(options.validate(), Err(SheetError::Config(_))));

    let mut options = StudioOptions::default();
    options.zoom_step = 0.0;
    assert!(matches!(options.validate(), Err(SheetError::Config(_))));

    let mut options = StudioOptions::default();
    options.max_upload_bytes = 0;
    assert!(matches!(options.validate(), Err(SheetError::Config(_))));
}

#[test]
fn test_frame_for_applies_zoom_limits() {
    let options = StudioOptions {
        passport_zoom_max: 2.0,
        ..Default::default()
    };
    let frame = options.frame_for(Product::Passport);
    assert_eq!(frame.zoom_max, 2.0);
    assert_eq!(frame.strategy, CropStrategy::FixedFrame);
    assert_eq!(options.frame_for(Product::Polaroid).strategy, CropStrategy::CoverFill);
}

#[test]
fn test_upload_ceiling_from_options() {
    let options = StudioOptions {
        max_upload_bytes: 4,
        ..Default::default()
    };
    let mut workflow = Workflow::new(options).unwrap();
    let file = UploadFile::new(
        "big.png",
        None,
        vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
    );
    assert!(matches!(
        workflow.submit_upload(file),
        Err(SheetError::Validation(ValidationError::FileTooLarge {
            size_bytes: 8,
            limit_bytes: 4
        }))
    ));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studio.json");

    let options = StudioOptions {
        default_mode: ProcessingMode::Studio,
        default_enhance_level: 0.6,
        default_font: FontId::Modern,
        default_copies: 3,
        ..Default::default()
    };
    options.save(&path).await.unwrap();

    let loaded = StudioOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studio.json");
    tokio::fs::write(&path, r#"{ "default_copies": 2 }"#).await.unwrap();

    let loaded = StudioOptions::load(&path).await.unwrap();
    assert_eq!(loaded.default_copies, 2);
    assert_eq!(loaded.zoom_step, StudioOptions::default().zoom_step);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studio.json");

    tokio::fs::write(&path, "not json").await.unwrap();
    assert!(matches!(
        StudioOptions::load(&path).await,
        Err(SheetError::Config(msg)) if msg.contains("parse")
    ));

    tokio::fs::write(&path, r#"{ "default_copies": 0 }"#).await.unwrap();
    assert!(matches!(
        StudioOptions::load(&path).await,
        Err(SheetError::Config(_))
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        StudioOptions::load(&missing).await,
        Err(SheetError::Io(_))
    ));
}
