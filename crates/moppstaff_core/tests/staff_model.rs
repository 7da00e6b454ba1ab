use moppstaff_core::{StaffMember, StaffStatus, StaffValidationError};

#[test]
fn new_trims_name_and_allocates_distinct_ids() {
    let first = StaffMember::new("  Ana  ", StaffStatus::Available, None).unwrap();
    let second = StaffMember::new("Ana", StaffStatus::Available, None).unwrap();

    assert_eq!(first.name, "Ana");
    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
}

#[test]
fn new_rejects_blank_name() {
    let err = StaffMember::new("   ", StaffStatus::Available, None).unwrap_err();
    assert_eq!(err, StaffValidationError::EmptyName);
}

#[test]
fn with_id_rejects_empty_id() {
    let err =
        StaffMember::with_id(String::new(), "Ana", StaffStatus::Standby, None).unwrap_err();
    assert_eq!(err, StaffValidationError::EmptyId);
}

#[test]
fn status_rotation_wraps_after_three_steps() {
    assert_eq!(StaffStatus::Available.next(), StaffStatus::Standby);
    assert_eq!(StaffStatus::Standby.next(), StaffStatus::Holiday);
    assert_eq!(StaffStatus::Holiday.next(), StaffStatus::Available);

    for status in [
        StaffStatus::Available,
        StaffStatus::Standby,
        StaffStatus::Holiday,
    ] {
        assert_eq!(status.next().next().next(), status);
    }
}

#[test]
fn status_tags_and_labels_are_stable() {
    assert_eq!(StaffStatus::Available.as_tag(), "AVAILABLE");
    assert_eq!(StaffStatus::Standby.as_tag(), "STANDBY");
    assert_eq!(StaffStatus::Holiday.as_tag(), "HOLIDAY");

    for status in [
        StaffStatus::Available,
        StaffStatus::Standby,
        StaffStatus::Holiday,
    ] {
        assert_eq!(StaffStatus::parse(status.as_tag()), Some(status));
    }
    assert_eq!(StaffStatus::parse("SICK"), None);
    assert_eq!(StaffStatus::parse("available"), None);

    assert_eq!(StaffStatus::Standby.label(), "Standby");
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let member = StaffMember::with_id(
        "m-1".to_string(),
        "Mouna Ait",
        StaffStatus::Standby,
        Some("file:///photos/mouna.jpg".to_string()),
    )
    .unwrap();

    let json = serde_json::to_value(&member).unwrap();
    assert_eq!(json["id"], "m-1");
    assert_eq!(json["name"], "Mouna Ait");
    assert_eq!(json["status"], "STANDBY");
    assert_eq!(json["photoUri"], "file:///photos/mouna.jpg");

    let decoded: StaffMember = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, member);
}

#[test]
fn absent_photo_is_omitted_from_the_wire_shape() {
    let member =
        StaffMember::with_id("m-2".to_string(), "Jonas", StaffStatus::Holiday, None).unwrap();

    let json = serde_json::to_value(&member).unwrap();
    assert!(json.get("photoUri").is_none());

    let decoded: StaffMember =
        serde_json::from_str(r#"{"id":"m-2","name":"Jonas","status":"HOLIDAY"}"#).unwrap();
    assert_eq!(decoded, member);
}

#[test]
fn decode_rejects_unknown_status_tag() {
    let result = serde_json::from_str::<StaffMember>(
        r#"{"id":"m-3","name":"Linda","status":"SICK"}"#,
    );
    assert!(result.is_err());
}

#[test]
fn initials_use_first_and_last_name_parts() {
    let single = StaffMember::new("Mouna", StaffStatus::Available, None).unwrap();
    assert_eq!(single.initials(), "M");

    let double = StaffMember::new("anna berg", StaffStatus::Available, None).unwrap();
    assert_eq!(double.initials(), "AB");

    let multi = StaffMember::new("Anna  Lind   Berg", StaffStatus::Available, None).unwrap();
    assert_eq!(multi.initials(), "AB");
}
