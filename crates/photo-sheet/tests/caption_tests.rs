use photo_sheet::caption::validate;
use photo_sheet::*;

#[test]
fn test_fifty_characters_valid() {
    assert_eq!(validate(&"a".repeat(50)), Ok(()));
    assert_eq!(validate(&"a".repeat(51)), Err(CaptionError::TooLong));
}

#[test]
fn test_empty_caption_valid() {
    assert_eq!(validate(""), Ok(()));
    assert!(CaptionSet::default().validate().is_ok());
}

#[test]
fn test_control_characters_rejected() {
    for text in ["tab\there", "line\nbreak", "carriage\rreturn"] {
        assert_eq!(validate(text), Err(CaptionError::InvalidCharacter));
    }
    assert_eq!(validate("spaces and émojis 🎉 are fine"), Ok(()));
}

#[test]
fn test_fields_reported_together() {
    let captions = CaptionSet::new("a".repeat(51), "ok\n", FontId::Default);
    match captions.validate() {
        Err(ValidationError::Captions(errors)) => {
            assert_eq!(errors.text1, Some(CaptionError::TooLong));
            assert_eq!(errors.text2, Some(CaptionError::InvalidCharacter));
            let message = errors.to_string();
            assert!(message.contains("first caption"));
            assert!(message.contains("second caption"));
        }
        other => panic!("expected caption errors, got {other:?}"),
    }
}

#[test]
fn test_validate_set_checks_each_field() {
    let errors = validate_set("Summer 2024", "bad\ttab");
    assert_eq!(errors.text1, None);
    assert_eq!(errors.text2, Some(CaptionError::InvalidCharacter));
    assert!(validate_set("", "").is_empty());
}

#[test]
fn test_copy_first_to_second_revalidates() {
    let mut captions = CaptionSet::new("Best friends", "", FontId::Script1);
    assert_eq!(captions.copy_first_to_second(), Ok(()));
    assert_eq!(captions.text2, "Best friends");

    captions.text1 = "x".repeat(51);
    assert_eq!(captions.copy_first_to_second(), Err(CaptionError::TooLong));
    assert_eq!(captions.text2.chars().count(), 51);

    captions.clear();
    assert!(captions.text1.is_empty() && captions.text2.is_empty());
    assert_eq!(captions.font, FontId::Script1);
}

#[test]
fn test_font_catalogue() {
    assert_eq!(FontId::ALL.len(), 11);
    assert_eq!("handwriting_01".parse::<FontId>().unwrap(), FontId::Handwriting1);
    assert!(matches!(
        "wingdings".parse::<FontId>(),
        Err(SheetError::Validation(ValidationError::UnknownFont(name))) if name == "wingdings"
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_font_serializes_as_catalogue_name() {
    let json = serde_json::to_string(&FontId::Elegant).unwrap();
    assert_eq!(json, "\"elegant_01\"");
}
