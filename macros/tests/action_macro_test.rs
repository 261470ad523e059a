//! Tests for #[derive(Action)] macro

use tasklist_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum TodoAction {
    Create { title: String },

    Toggle(u64),

    #[action(kind = "WIPE")]
    ClearAll,

    SetDraft { text: String },
}

#[derive(Action, Clone, Debug)]
enum Wrapped<T> {
    Item(T),
    Nothing,
}

#[test]
fn test_default_kind_names() {
    let action = TodoAction::Create {
        title: "Test".to_string(),
    };
    assert_eq!(action.kind(), "CREATE");
    assert_eq!(TodoAction::Toggle(3).kind(), "TOGGLE");
    assert_eq!(
        TodoAction::SetDraft {
            text: String::new()
        }
        .kind(),
        "SET_DRAFT"
    );
}

#[test]
fn test_kind_override() {
    assert_eq!(TodoAction::ClearAll.kind(), "WIPE");
}

#[test]
fn test_kinds_in_declaration_order() {
    assert_eq!(TodoAction::KINDS, &["CREATE", "TOGGLE", "WIPE", "SET_DRAFT"]);
}

#[test]
fn test_generic_enum() {
    assert_eq!(Wrapped::Item(1_u8).kind(), "ITEM");
    assert_eq!(Wrapped::<u8>::Nothing.kind(), "NOTHING");
    assert_eq!(Wrapped::<String>::KINDS.len(), 2);
}

