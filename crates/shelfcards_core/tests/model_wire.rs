use shelfcards_core::{CardText, EntityId, Flashcard, Shelf, TextField, ValidationError};

#[test]
fn shelf_serializes_with_id_and_title() {
    let shelf = Shelf::new(EntityId::from("1700000000000"), " Spanish ").unwrap();

    let json = serde_json::to_value(&shelf).unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "id": "1700000000000", "title": "Spanish" })
    );
}

#[test]
fn flashcard_uses_shelf_id_wire_name() {
    let text = CardText::parse("hola", "hello").unwrap();
    let card = Flashcard::new(EntityId::from("c1"), EntityId::from("s1"), text);

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["shelfId"], "s1");
    assert!(json.get("shelf_id").is_none());

    let decoded: Flashcard = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, card);
}

#[test]
fn records_decode_regardless_of_field_order() {
    let raw = r#"{"answer":"A","question":"Q","shelfId":"s","id":"c"}"#;
    let card: Flashcard = serde_json::from_str(raw).unwrap();
    assert_eq!(card.id, EntityId::from("c"));
    assert_eq!(card.shelf_id, EntityId::from("s"));
}

#[test]
fn card_text_validates_question_before_answer() {
    let err = CardText::parse("", "").unwrap_err();
    assert_eq!(err, ValidationError::Empty(TextField::Question));
}
